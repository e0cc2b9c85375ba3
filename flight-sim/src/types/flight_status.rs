/// Status of a replayed mission.
///
/// `Flying` is the only non-terminal status; both outcomes are absorbing.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FlightStatus {
    Flying,
    FlewProperly,
    LandedHalfway,
}

impl FlightStatus {
    /// Marker label shown for the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            FlightStatus::Flying => "flying",
            FlightStatus::FlewProperly => "flew properly",
            FlightStatus::LandedHalfway => "landed halfway",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, FlightStatus::Flying)
    }
}
