//! Agent mode toggle widget.

use crate::component::Component;
use crate::text::visible_text_width;
use crate::theme::{ChatTheme, ModeStyle};

/// One of the fixed operating presets. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentMode {
    Fast,
    Max,
    Plan,
}

impl AgentMode {
    pub const ALL: [AgentMode; 3] = [AgentMode::Fast, AgentMode::Max, AgentMode::Plan];

    pub fn label(self) -> &'static str {
        match self {
            Self::Fast => "FAST",
            Self::Max => "MAX",
            Self::Plan => "PLAN",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "fast" => Some(Self::Fast),
            "max" => Some(Self::Max),
            "plan" => Some(Self::Plan),
            _ => None,
        }
    }
}

/// Collapsed/expanded mode selector. Collapsed it shows only the active mode
/// with a `<` affordance; expanded it shows every mode in declared order with
/// the active one last. Mode changes only happen through presses.
pub struct ModeToggle {
    mode: AgentMode,
    is_open: bool,
    theme: ChatTheme,
    on_toggle: Option<Box<dyn FnMut()>>,
    on_select_mode: Option<Box<dyn FnMut(AgentMode)>>,
}

impl ModeToggle {
    pub fn new(mode: AgentMode, theme: ChatTheme) -> Self {
        Self {
            mode,
            is_open: false,
            theme,
            on_toggle: None,
            on_select_mode: None,
        }
    }

    pub fn mode(&self) -> AgentMode {
        self.mode
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn set_on_toggle(&mut self, on_toggle: Option<Box<dyn FnMut()>>) {
        self.on_toggle = on_toggle;
    }

    pub fn set_on_select_mode(&mut self, on_select_mode: Option<Box<dyn FnMut(AgentMode)>>) {
        self.on_select_mode = on_select_mode;
    }

    /// Pressing the active mode toggles between collapsed and expanded.
    /// Pressing any other mode makes it active, reports the switch through
    /// `on_select_mode` (or the generic `on_toggle` when unset), and always
    /// collapses.
    pub fn press(&mut self, pressed: AgentMode) {
        if pressed == self.mode {
            self.is_open = !self.is_open;
            return;
        }

        self.mode = pressed;
        if let Some(on_select_mode) = self.on_select_mode.as_mut() {
            on_select_mode(pressed);
        } else if let Some(on_toggle) = self.on_toggle.as_mut() {
            on_toggle();
        }
        self.is_open = false;
    }

    /// Maps a press at `column` (relative to the widget's left edge) to the
    /// segment under it. Collapsed, the whole widget is one press target;
    /// expanded, only the mode cells respond and the separators are inert.
    pub fn press_at(&mut self, column: usize) -> bool {
        if !self.is_open {
            let content_width = visible_text_width(&segment_content(self.mode, true, false));
            if column < content_width + 2 {
                self.press(self.mode);
                return true;
            }
            return false;
        }

        let mut x = 1;
        for mode in self.ordered_modes() {
            let width = visible_text_width(&segment_content(mode, mode == self.mode, true));
            if column >= x && column < x + width {
                self.press(mode);
                return true;
            }
            x += width + 1;
        }
        false
    }

    /// Non-active modes in declared order, then the active mode.
    fn ordered_modes(&self) -> Vec<AgentMode> {
        let mut ordered: Vec<AgentMode> = AgentMode::ALL
            .into_iter()
            .filter(|mode| *mode != self.mode)
            .collect();
        ordered.push(self.mode);
        ordered
    }

    fn mode_style(&self, mode: AgentMode) -> &ModeStyle {
        match mode {
            AgentMode::Fast => &self.theme.mode_fast,
            AgentMode::Max => &self.theme.mode_max,
            AgentMode::Plan => &self.theme.mode_plan,
        }
    }

    fn render_collapsed(&self) -> Vec<String> {
        let style = self.mode_style(self.mode);
        let content = segment_content(self.mode, true, false);
        let horizontal = "─".repeat(visible_text_width(&content));

        vec![
            (style.frame)(&format!("╭{horizontal}╮")),
            format!(
                "{}{}{}",
                (style.frame)("│"),
                (style.text)(&content),
                (style.frame)("│")
            ),
            (style.frame)(&format!("╰{horizontal}╯")),
        ]
    }

    fn render_expanded(&self) -> Vec<String> {
        let ordered = self.ordered_modes();
        let first_style = self.mode_style(ordered[0]);

        let mut top = (first_style.frame)("╭");
        let mut middle = (first_style.frame)("│");
        let mut bottom = (first_style.frame)("╰");

        for (index, mode) in ordered.iter().enumerate() {
            let style = self.mode_style(*mode);
            let is_last = index == ordered.len() - 1;
            let content = segment_content(*mode, *mode == self.mode, true);
            let horizontal = "─".repeat(visible_text_width(&content));

            let top_corner = if is_last { "╮" } else { "┬" };
            let bottom_corner = if is_last { "╯" } else { "┴" };
            top.push_str(&(style.frame)(&format!("{horizontal}{top_corner}")));
            middle.push_str(&(style.text)(&content));
            middle.push_str(&(style.frame)("│"));
            bottom.push_str(&(style.frame)(&format!("{horizontal}{bottom_corner}")));
        }

        vec![top, middle, bottom]
    }
}

fn segment_content(mode: AgentMode, is_active: bool, expanded: bool) -> String {
    let label = mode.label();
    if !expanded {
        format!(" {label} < ")
    } else if is_active {
        format!(" {label} > ")
    } else {
        format!(" {label} ")
    }
}

impl Component for ModeToggle {
    fn render(&mut self, _width: usize) -> Vec<String> {
        if self.is_open {
            self.render_expanded()
        } else {
            self.render_collapsed()
        }
    }
}
