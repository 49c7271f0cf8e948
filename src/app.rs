use crate::map::{MapRenderer, Viewport};
use crate::markers::MarkerStore;
use crate::selection::{SelectionController, SelectionState};

/// Application state
pub struct App {
    pub viewport: Viewport,
    pub map_renderer: MapRenderer,
    pub store: MarkerStore,
    pub selection: SelectionController,
    pub should_quit: bool,
    /// Last mouse position while the left button is held
    pub last_mouse: Option<(u16, u16)>,
    /// Set once a held left button has moved (a drag, not a click)
    dragged: bool,
}

impl App {
    pub fn new(width: usize, height: usize, store: MarkerStore) -> Self {
        let (pixel_width, pixel_height) = Self::pixel_size(width, height);
        Self {
            viewport: Viewport::world(pixel_width, pixel_height),
            map_renderer: MapRenderer::new(),
            store,
            selection: SelectionController::new(),
            should_quit: false,
            last_mouse: None,
            dragged: false,
        }
    }

    /// Braille pixels available inside the map border and above the status bar
    fn pixel_size(width: usize, height: usize) -> (usize, usize) {
        let inner_width = width.saturating_sub(2);
        let inner_height = height.saturating_sub(3);
        (inner_width * 2, inner_height * 4)
    }

    /// Update viewport size when terminal resizes
    pub fn resize(&mut self, width: usize, height: usize) {
        let (pixel_width, pixel_height) = Self::pixel_size(width, height);
        self.viewport.width = pixel_width;
        self.viewport.height = pixel_height;
    }

    /// Terminal cell to the Braille pixel at the cell's centre
    pub fn cell_to_pixel(col: u16, row: u16) -> (i32, i32) {
        let px = (col.saturating_sub(1) as i32) * 2 + 1;
        let py = (row.saturating_sub(1) as i32) * 4 + 2;
        (px, py)
    }

    pub fn pan(&mut self, dx: i32, dy: i32) {
        self.viewport.pan(dx, dy);
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    pub fn zoom_in_at(&mut self, col: u16, row: u16) {
        let (px, py) = Self::cell_to_pixel(col, row);
        self.viewport.zoom_in_at(px, py);
    }

    pub fn zoom_out_at(&mut self, col: u16, row: u16) {
        let (px, py) = Self::cell_to_pixel(col, row);
        self.viewport.zoom_out_at(px, py);
    }

    /// Back to the whole-world view
    pub fn reset_view(&mut self) {
        self.viewport = Viewport::world(self.viewport.width, self.viewport.height);
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Pointer moved over the map
    pub fn pointer_moved(&mut self, col: u16, row: u16) {
        let (px, py) = Self::cell_to_pixel(col, row);
        let viewport = &self.viewport;
        self.selection
            .on_pointer_move(&mut self.store, |m| m.is_inside(viewport, px, py));
    }

    /// Pointer clicked on the map
    pub fn pointer_clicked(&mut self, col: u16, row: u16) {
        let (px, py) = Self::cell_to_pixel(col, row);
        let viewport = &self.viewport;
        self.selection
            .on_pointer_click(&mut self.store, |m| m.is_inside(viewport, px, py));
    }

    /// Left button pressed
    pub fn press(&mut self, col: u16, row: u16) {
        self.last_mouse = Some((col, row));
        self.dragged = false;
    }

    /// Left button dragged: pan
    pub fn handle_drag(&mut self, col: u16, row: u16) {
        if let Some((last_x, last_y)) = self.last_mouse {
            let dx = last_x as i32 - col as i32;
            let dy = last_y as i32 - row as i32;
            if dx != 0 || dy != 0 {
                self.dragged = true;
            }
            // Less sensitive when zoomed out
            let scale = if self.viewport.zoom < 2.0 {
                2
            } else if self.viewport.zoom < 4.0 {
                3
            } else {
                4
            };
            self.pan(dx * scale, dy * scale);
        }
        self.last_mouse = Some((col, row));
    }

    /// Left button released: a release without a drag is a click
    pub fn release(&mut self, col: u16, row: u16) {
        let was_drag = self.dragged;
        self.last_mouse = None;
        self.dragged = false;
        if !was_drag {
            self.pointer_clicked(col, row);
        }
    }

    pub fn zoom_level(&self) -> String {
        format!("{:.1}x", self.viewport.zoom)
    }

    pub fn center_coords(&self) -> String {
        format!(
            "{:.1}°{}, {:.1}°{}",
            self.viewport.center_lat.abs(),
            if self.viewport.center_lat >= 0.0 { "N" } else { "S" },
            self.viewport.center_lon.abs(),
            if self.viewport.center_lon >= 0.0 { "E" } else { "W" }
        )
    }

    /// Land/ocean counts for the status bar
    pub fn quake_summary(&self) -> String {
        format!(
            "{} land / {} ocean",
            self.store.tally.land(),
            self.store.tally.ocean
        )
    }

    pub fn selection_label(&self) -> &'static str {
        match self.selection.state() {
            SelectionState::Idle => "idle",
            SelectionState::Hovering(_) => "hover",
            SelectionState::Clicked(_) => "filtered (click to clear)",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::feed::PointRecord;
    use crate::location::Location;
    use crate::markers::CityInfo;

    fn app() -> App {
        let mut quake = PointRecord::new(Location::new(0.0, 0.0));
        quake.magnitude = Some(5.0);
        let cities = vec![(
            Location::new(0.0, 30.0),
            CityInfo {
                name: "Faraway".to_string(),
                country: None,
                population: None,
            },
        )];
        let store = MarkerStore::build(vec![], cities, vec![quake]);
        let mut app = App::new(102, 53, store);
        app.viewport = Viewport::new(0.0, 0.0, 1.0, 200, 200);
        app
    }

    /// Terminal cell whose centre pixel lands on the location
    fn cell_of(app: &App, location: &Location) -> (u16, u16) {
        let (px, py) = app.viewport.project_location(location);
        ((px / 2 + 1) as u16, (py / 4 + 1) as u16)
    }

    #[test]
    fn test_cell_to_pixel() {
        assert_eq!(App::cell_to_pixel(1, 1), (1, 2));
        assert_eq!(App::cell_to_pixel(0, 0), (1, 2));
        assert_eq!(App::cell_to_pixel(11, 6), (21, 22));
    }

    #[test]
    fn test_hover_through_pointer() {
        let mut app = app();
        let (col, row) = cell_of(&app, &Location::new(0.0, 0.0));
        app.pointer_moved(col, row);
        assert!(app.store.quakes[0].selected);
        assert_eq!(app.selection_label(), "hover");
    }

    #[test]
    fn test_click_without_drag_filters() {
        let mut app = app();
        let (col, row) = cell_of(&app, &Location::new(0.0, 0.0));
        app.press(col, row);
        app.release(col, row);
        assert!(app.store.cities[0].hidden);

        app.press(1, 1);
        app.release(1, 1);
        assert!(!app.store.cities[0].hidden);
        assert_eq!(app.selection_label(), "idle");
    }

    #[test]
    fn test_drag_is_not_a_click() {
        let mut app = app();
        let (col, row) = cell_of(&app, &Location::new(0.0, 0.0));
        let before = app.viewport.center_lon;
        app.press(col, row);
        app.handle_drag(col + 3, row);
        app.release(col + 3, row);
        assert!(app.store.markers().all(|m| !m.hidden));
        assert!(app.viewport.center_lon != before);
    }

    #[test]
    fn test_reset_view() {
        let mut app = app();
        app.zoom_in();
        app.pan(30, 10);
        app.reset_view();
        assert_eq!(app.viewport.zoom, 1.0);
        assert_eq!(app.viewport.center_lon, 0.0);
        assert_eq!(app.viewport.width, 200);
    }
}
