use gridsearch::{Phase, SearchEngine};

/// The lifecycle controls, available both as buttons and as keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonId {
    Start,
    Step,
    Finish,
    Reset,
}

impl ButtonId {
    pub fn label(&self) -> &str {
        match self {
            ButtonId::Start => "Start",
            ButtonId::Step => "Step",
            ButtonId::Finish => "Finish",
            ButtonId::Reset => "Reset",
        }
    }

    /// iterates over all button ids
    pub fn iterate() -> impl Iterator<Item = ButtonId> {
        [
            ButtonId::Start,
            ButtonId::Step,
            ButtonId::Finish,
            ButtonId::Reset,
        ]
        .iter()
        .copied()
    }

    pub fn from_key(key: egui::Key) -> Option<ButtonId> {
        match key {
            egui::Key::Enter => Some(ButtonId::Start),
            egui::Key::Space => Some(ButtonId::Step),
            egui::Key::F => Some(ButtonId::Finish),
            egui::Key::Escape => Some(ButtonId::Reset),
            _ => None,
        }
    }

    pub fn key(&self) -> egui::Key {
        match self {
            ButtonId::Start => egui::Key::Enter,
            ButtonId::Step => egui::Key::Space,
            ButtonId::Finish => egui::Key::F,
            ButtonId::Reset => egui::Key::Escape,
        }
    }

    /// Whether pressing the button can do anything for the given engine
    pub fn is_enabled(&self, engine: &SearchEngine) -> bool {
        match self {
            ButtonId::Start => {
                !engine.is_running() && engine.start().is_some() && engine.end().is_some()
            }
            ButtonId::Step | ButtonId::Finish => engine.is_running(),
            ButtonId::Reset => true,
        }
    }

    pub fn apply(&self, engine: &mut SearchEngine) -> Phase {
        match self {
            ButtonId::Start => engine.start_simulation(),
            ButtonId::Step => {
                engine.step_simulation();
            }
            ButtonId::Finish => {
                engine.finish_simulation();
            }
            ButtonId::Reset => engine.reset_simulation(),
        }
        engine.phase()
    }
}

#[cfg(test)]
mod test {
    use gridsearch::{create_search_grid, Point};

    use super::*;

    #[test]
    fn test_keys() {
        for button in ButtonId::iterate() {
            assert_eq!(ButtonId::from_key(button.key()), Some(button));
        }
        assert_eq!(ButtonId::from_key(egui::Key::A), None);
    }

    #[test]
    fn test_buttons_drive_engine() {
        let mut engine = create_search_grid(3, 3);
        assert!(!ButtonId::Start.is_enabled(&engine));
        assert!(ButtonId::Reset.is_enabled(&engine));

        engine.set_start(Point::new(0, 0));
        engine.set_end(Point::new(2, 2));
        assert!(ButtonId::Start.is_enabled(&engine));
        assert!(!ButtonId::Step.is_enabled(&engine));

        assert_eq!(ButtonId::Start.apply(&mut engine), Phase::Running);
        assert!(!ButtonId::Start.is_enabled(&engine));
        assert!(ButtonId::Step.is_enabled(&engine));

        assert_eq!(ButtonId::Step.apply(&mut engine), Phase::Running);
        assert_eq!(engine.expansions(), 1);

        assert_eq!(ButtonId::Finish.apply(&mut engine), Phase::Completed);
        assert_eq!(ButtonId::Reset.apply(&mut engine), Phase::Editing);
    }
}
