//! Owning-context contract: the citizen a worker AI drives and its job.

/// What the colony wants a citizen to be doing right now.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DesiredActivity {
    #[default]
    Idle,
    Sleep,
    Work,
    Mourn,
}

/// Status flag shown to players for a citizen.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CitizenStatus {
    #[default]
    Idle,
    Working,
    Sleeping,
    Eating,
}

/// Handle to the live entity of a citizen.
///
/// Handles are owned by the AI; hosts typically implement this on a shared
/// reference into their entity storage.
pub trait Worker {
    fn desired_activity(&self) -> DesiredActivity;

    fn set_status(&mut self, status: CitizenStatus);
}

/// Job assignment a worker AI is built for.
pub trait Job {
    type Worker: Worker;

    /// Returns a human-readable job name (used in logging and errors).
    fn name(&self) -> &str;

    /// Returns the live entity of the citizen holding this job, if any.
    fn citizen_entity(&self) -> Option<Self::Worker>;
}
