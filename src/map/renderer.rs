use crate::braille::BrailleCanvas;
use crate::classify::Boundary;
use crate::map::geometry::{
    draw_circle, draw_cross, draw_line, draw_ring, draw_square, draw_triangle,
};
use crate::map::projection::Viewport;
use crate::markers::{DepthClass, Marker, MarkerKind, MarkerStore};
use crate::selection::SelectionController;

/// Display settings for map layers
#[derive(Clone)]
pub struct DisplaySettings {
    pub show_outlines: bool,
    pub show_cities: bool,
    pub show_quakes: bool,
    pub show_legend: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_outlines: true,
            show_cities: true,
            show_quakes: true,
            show_legend: true,
        }
    }
}

/// One canvas per colour; the UI stacks them back to front
pub struct MapLayers {
    pub outlines: BrailleCanvas,
    pub cities: BrailleCanvas,
    pub shallow: BrailleCanvas,
    pub intermediate: BrailleCanvas,
    pub deep: BrailleCanvas,
    pub threat: BrailleCanvas,
    /// Selected marker: position in pixels plus tooltip lines
    pub tooltip: Option<(i32, i32, Vec<String>)>,
}

impl MapLayers {
    fn new(width: usize, height: usize) -> Self {
        let canvas = BrailleCanvas::new(width, height);
        Self {
            outlines: canvas.clone(),
            cities: canvas.clone(),
            shallow: canvas.clone(),
            intermediate: canvas.clone(),
            deep: canvas.clone(),
            threat: canvas,
            tooltip: None,
        }
    }

    fn quake_layer(&mut self, class: DepthClass) -> &mut BrailleCanvas {
        match class {
            DepthClass::Shallow => &mut self.shallow,
            DepthClass::Intermediate => &mut self.intermediate,
            DepthClass::Deep => &mut self.deep,
        }
    }
}

/// Draws country outlines and the visible markers
pub struct MapRenderer {
    pub settings: DisplaySettings,
}

impl MapRenderer {
    pub fn new() -> Self {
        Self {
            settings: DisplaySettings::default(),
        }
    }

    pub fn toggle_outlines(&mut self) {
        self.settings.show_outlines = !self.settings.show_outlines;
    }

    pub fn toggle_cities(&mut self) {
        self.settings.show_cities = !self.settings.show_cities;
    }

    pub fn toggle_quakes(&mut self) {
        self.settings.show_quakes = !self.settings.show_quakes;
    }

    pub fn toggle_legend(&mut self) {
        self.settings.show_legend = !self.settings.show_legend;
    }

    /// Render into character-sized layers (`width` x `height` cells)
    pub fn render(
        &self,
        width: usize,
        height: usize,
        viewport: &Viewport,
        store: &MarkerStore,
        selection: &SelectionController,
    ) -> MapLayers {
        let mut layers = MapLayers::new(width, height);

        if self.settings.show_outlines {
            for boundary in &store.countries {
                draw_boundary(&mut layers.outlines, boundary, viewport);
            }
        }

        if let Some((quake, radius_km)) = selection.clicked_threat(store) {
            let (px, py) = viewport.project_location(&quake.location);
            let radius_px = viewport.km_to_pixels(&quake.location, radius_km);
            draw_ring(&mut layers.threat, px, py, radius_px);
        }

        if self.settings.show_quakes {
            for quake in store.quakes.iter().filter(|m| !m.hidden) {
                draw_quake(&mut layers, quake, viewport);
            }
        }

        if self.settings.show_cities {
            for city in store.cities.iter().filter(|m| !m.hidden) {
                let (px, py) = viewport.project_location(&city.location);
                if viewport.is_visible(px, py) {
                    draw_triangle(&mut layers.cities, px, py, city.size_px());
                }
            }
        }

        if let Some(marker) = store.selected().filter(|m| !m.hidden) {
            let (px, py) = viewport.project_location(&marker.location);
            if viewport.is_visible(px, py) {
                layers.tooltip = Some((px, py, marker.title_lines()));
            }
        }

        layers
    }
}

impl Default for MapRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Outline every exterior ring of a boundary
fn draw_boundary(canvas: &mut BrailleCanvas, boundary: &Boundary, viewport: &Viewport) {
    for polygon in boundary.polygons() {
        let mut prev: Option<(i32, i32)> = None;
        for coord in polygon.exterior().coords() {
            let (px, py) = viewport.project(coord.x, coord.y);
            if let Some((prev_x, prev_y)) = prev {
                // Skip segments that jump across the antimeridian
                let dist = ((px - prev_x).abs() + (py - prev_y).abs()) as usize;
                if dist < viewport.width
                    && viewport.line_might_be_visible((prev_x, prev_y), (px, py))
                {
                    draw_line(canvas, prev_x, prev_y, px, py);
                }
            }
            prev = Some((px, py));
        }
    }
}

/// Circle for land, square for ocean, coloured by depth, crossed when recent
fn draw_quake(layers: &mut MapLayers, quake: &Marker, viewport: &Viewport) {
    let (px, py) = viewport.project_location(&quake.location);
    if !viewport.is_visible(px, py) {
        return;
    }
    let size = quake.size_px();
    let class = quake.depth_class().unwrap_or(DepthClass::Shallow);
    let canvas = layers.quake_layer(class);

    match quake.kind {
        MarkerKind::LandQuake(_) => draw_circle(canvas, px, py, size),
        MarkerKind::OceanQuake(_) => draw_square(canvas, px, py, size),
        MarkerKind::City(_) => return,
    }

    if quake.is_past_hour() {
        draw_cross(&mut layers.threat, px, py, size + 1);
    }
}
