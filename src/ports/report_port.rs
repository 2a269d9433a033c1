//! Report output port.

use crate::domain::error::ScreenerError;
use crate::domain::screening::ScreeningCandidate;
use std::io::Write;

/// Port for presenting the candidates of a screening run.
pub trait ReportPort {
    fn write(&self, candidates: &[ScreeningCandidate], out: &mut dyn Write) -> Result<(), ScreenerError>;
}
