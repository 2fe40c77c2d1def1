//! Toolbar drop-down state. At most one menu is open.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Menu {
    /// Frame ratio presets and free entry.
    Frame,
    /// Guide and marker modes.
    Line,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MenuState {
    open: Option<Menu>,
}

impl MenuState {
    pub fn open(&self) -> Option<Menu> {
        self.open
    }

    pub fn is_open(&self, menu: Menu) -> bool {
        self.open == Some(menu)
    }

    /// Open `menu`, closing the other one, or close it if already open.
    pub fn toggle(&mut self, menu: Menu) {
        self.open = if self.is_open(menu) { None } else { Some(menu) };
    }

    pub fn close(&mut self) {
        self.open = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menus_are_exclusive() {
        let mut menus = MenuState::default();
        menus.toggle(Menu::Frame);
        assert!(menus.is_open(Menu::Frame));

        menus.toggle(Menu::Line);
        assert!(menus.is_open(Menu::Line));
        assert!(!menus.is_open(Menu::Frame));

        menus.toggle(Menu::Line);
        assert_eq!(menus.open(), None);
    }

    #[test]
    fn test_close() {
        let mut menus = MenuState::default();
        menus.toggle(Menu::Frame);
        menus.close();
        assert_eq!(menus.open(), None);
    }
}
