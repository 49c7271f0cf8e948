use crate::markers::store::{Collection, MarkerId, MarkerStore};
use crate::markers::Marker;

/// Observable interaction state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionState {
    Idle,
    Hovering(MarkerId),
    Clicked(MarkerId),
}

/// Hover/click state machine over the quake and city collections.
///
/// At most one marker is hovered (and therefore `selected`) at a time.
/// While a click is active, pointer moves are ignored; the next click
/// anywhere clears the filter.
#[derive(Clone, Debug, Default)]
pub struct SelectionController {
    hovered: Option<MarkerId>,
    clicked: Option<MarkerId>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SelectionState {
        match (self.clicked, self.hovered) {
            (Some(id), _) => SelectionState::Clicked(id),
            (None, Some(id)) => SelectionState::Hovering(id),
            (None, None) => SelectionState::Idle,
        }
    }

    pub fn hovered(&self) -> Option<MarkerId> {
        self.hovered
    }

    pub fn clicked(&self) -> Option<MarkerId> {
        self.clicked
    }

    /// Pointer moved: re-pick the hovered marker, quakes before cities
    pub fn on_pointer_move<F>(&mut self, store: &mut MarkerStore, hit: F)
    where
        F: Fn(&Marker) -> bool,
    {
        if self.clicked.is_some() {
            return;
        }

        if let Some(marker) = self.hovered.take().and_then(|id| store.get_mut(id)) {
            marker.selected = false;
        }

        let found = first_hit(&store.quakes, &hit)
            .map(MarkerId::quake)
            .or_else(|| first_hit(&store.cities, &hit).map(MarkerId::city));

        if let Some(id) = found {
            if let Some(marker) = store.get_mut(id) {
                marker.selected = true;
                self.hovered = Some(id);
            }
        }
    }

    /// Pointer clicked: clear an active filter, or filter around the hit marker
    pub fn on_pointer_click<F>(&mut self, store: &mut MarkerStore, hit: F)
    where
        F: Fn(&Marker) -> bool,
    {
        if self.clicked.take().is_some() {
            store.unhide_all();
            if let Some(marker) = self.hovered.take().and_then(|id| store.get_mut(id)) {
                marker.selected = false;
            }
            return;
        }

        if let Some(index) = first_hit(&store.quakes, &hit) {
            log::debug!("quake {} clicked", index);
            filter_around_quake(store, index);
            self.clicked = Some(MarkerId::quake(index));
        } else if let Some(index) = first_hit(&store.cities, &hit) {
            log::debug!("city {} clicked", index);
            filter_around_city(store, index);
            self.clicked = Some(MarkerId::city(index));
        }
    }

    /// Threat radius to draw for the clicked quake, if one is clicked
    pub fn clicked_threat<'a>(&self, store: &'a MarkerStore) -> Option<(&'a Marker, f64)> {
        let id = self.clicked.filter(|id| id.collection == Collection::Quakes)?;
        let marker = store.get(id)?;
        Some((marker, marker.threat_radius_km()?))
    }
}

/// Index of the first visible marker the pointer hits
fn first_hit<F>(markers: &[Marker], hit: &F) -> Option<usize>
where
    F: Fn(&Marker) -> bool,
{
    markers.iter().position(|m| !m.hidden && hit(m))
}

fn quake_radius(quake: &Marker) -> f64 {
    quake
        .threat_radius_km()
        .unwrap_or_else(|| unreachable!("non-quake marker in quake collection"))
}

/// Hide every other quake and every city outside the clicked quake's threat radius
fn filter_around_quake(store: &mut MarkerStore, index: usize) {
    let center = store.quakes[index].location;
    let radius = quake_radius(&store.quakes[index]);

    for (i, quake) in store.quakes.iter_mut().enumerate() {
        if i != index {
            quake.hidden = true;
        }
    }
    for city in store.cities.iter_mut() {
        if city.distance_km(&center) > radius {
            city.hidden = true;
        }
    }
}

/// Hide every other city and every quake whose own threat radius misses the clicked city
fn filter_around_city(store: &mut MarkerStore, index: usize) {
    let center = store.cities[index].location;

    for (i, city) in store.cities.iter_mut().enumerate() {
        if i != index {
            city.hidden = true;
        }
    }
    for quake in store.quakes.iter_mut() {
        if quake.distance_km(&center) > quake_radius(quake) {
            quake.hidden = true;
        }
    }
}
