use std::fmt;
use std::str::FromStr;

/// Events every engine starts with.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum EngineEvent {
    /// Fired once when the session starts, before the first render.
    #[strum(serialize = "onstart")]
    OnStart,
    /// Fired after a tile is placed or removed through the engine.
    #[strum(serialize = "update_map")]
    UpdateMap,
    /// Fired at the end of every turn advance.
    #[strum(serialize = "step_end")]
    StepEnd,
    /// Fired once when the session ends.
    #[strum(serialize = "onend")]
    OnEnd,
}

impl EngineEvent {
    pub const ALL: [EngineEvent; 4] = [
        EngineEvent::OnStart,
        EngineEvent::UpdateMap,
        EngineEvent::StepEnd,
        EngineEvent::OnEnd,
    ];
}

/// Events an item can fire. The set is fixed for the item's lifetime.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ItemEvent {
    /// The character stepped onto the item's tile.
    Enter,
    /// The character left the item's tile.
    Leave,
    /// One of the item's timers expired.
    Timeout,
    /// The item was taken off the map.
    Removed,
}

impl ItemEvent {
    pub const ALL: [ItemEvent; 4] = [
        ItemEvent::Enter,
        ItemEvent::Leave,
        ItemEvent::Timeout,
        ItemEvent::Removed,
    ];
}

/// Key of an engine-level event: a built-in kind or a runtime-registered name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKey {
    Builtin(EngineEvent),
    Custom(String),
}

impl From<EngineEvent> for EventKey {
    fn from(event: EngineEvent) -> Self {
        Self::Builtin(event)
    }
}

impl From<&str> for EventKey {
    /// Built-in names resolve to their enum variant, anything else is custom.
    fn from(name: &str) -> Self {
        match EngineEvent::from_str(name) {
            Ok(event) => Self::Builtin(event),
            Err(_) => Self::Custom(name.to_owned()),
        }
    }
}

impl From<String> for EventKey {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKey::Builtin(event) => write!(f, "{event}"),
            EventKey::Custom(name) => f.write_str(name),
        }
    }
}
