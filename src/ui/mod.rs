pub mod month_pane;

pub use month_pane::MonthPane;

#[derive(Clone, Debug)]
pub struct Theme {
    pub today_char: Option<char>,
    pub focus_char: Option<char>,
    pub styled: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            today_char: Some('*'),
            focus_char: None,
            styled: true,
        }
    }
}
