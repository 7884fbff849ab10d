use cards::{CardNumber, Cvv, ExpiryDate};
use common_utils::errors::ValidationError;
use time::OffsetDateTime;

/// Full card details for a charge or periodic setup.
///
/// Absent entirely when completing a pre-auth (the reservation already holds
/// the card) and for refunds and triggers.
#[derive(Debug, Clone)]
pub struct CardDetails {
    pub number: CardNumber,
    pub expiry: ExpiryDate,
    pub cvv: Option<Cvv>,
}

impl CardDetails {
    pub fn new(number: CardNumber, expiry: ExpiryDate) -> Self {
        Self {
            number,
            expiry,
            cvv: None,
        }
    }

    pub fn with_cvv(mut self, cvv: Cvv) -> Self {
        self.cvv = Some(cvv);
        self
    }

    /// Run the card-level checks in the fixed order number → expiry → cvv.
    ///
    /// The cvv is optional: absent passes unless `require_cvv` is set.
    pub fn validate_at(
        &self,
        now: OffsetDateTime,
        require_cvv: bool,
    ) -> Result<(), ValidationError> {
        self.number.validate()?;
        self.expiry.validate_at(now)?;
        match (&self.cvv, require_cvv) {
            (Some(cvv), _) => cvv.validate(),
            (None, true) => Err(ValidationError::invalid("Invalid CVV code")),
            (None, false) => Ok(()),
        }
    }
}
