#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
  Quit,
  MoveUp,
  MoveDown,
  MoveLeft,
  MoveRight,
  GoToTop,
  GoToBottom,
  GoHome,
  ToggleSelect,
  ClearSelection,
  CopyHere,
  MoveHere,
  DeleteSelection,
  ToggleHidden,
  Reload,
  PromptInput(char),
  PromptCancel,
  Resize(u16, u16),
  Tick,
  None,
}

impl Action {
  /// Maps names from the `[keys.normal]` config table.
  pub fn from_name(name: &str) -> Option<Action> {
    match name {
      "quit" => Some(Action::Quit),
      "move_up" => Some(Action::MoveUp),
      "move_down" => Some(Action::MoveDown),
      "move_left" => Some(Action::MoveLeft),
      "move_right" => Some(Action::MoveRight),
      "go_to_top" => Some(Action::GoToTop),
      "go_to_bottom" => Some(Action::GoToBottom),
      "go_home" => Some(Action::GoHome),
      "toggle_select" => Some(Action::ToggleSelect),
      "clear_selection" => Some(Action::ClearSelection),
      "copy_here" => Some(Action::CopyHere),
      "move_here" => Some(Action::MoveHere),
      "delete_selection" => Some(Action::DeleteSelection),
      "toggle_hidden" => Some(Action::ToggleHidden),
      "reload" => Some(Action::Reload),
      _ => None,
    }
  }
}
