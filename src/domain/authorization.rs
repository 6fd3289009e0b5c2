use super::participant::ParticipantRef;
use super::user::UserId;
use crate::error::{LedgerError, Result};

/// Confirms that the invoking participant is the one a record requires.
///
/// Fails if either side is absent or the fully-qualified identifiers differ;
/// otherwise returns the confirmed participant.
pub fn check_participant(
    invoking: Option<&ParticipantRef>,
    required: Option<&ParticipantRef>,
) -> Result<ParticipantRef> {
    let (Some(invoking), Some(required)) = (invoking, required) else {
        return Err(LedgerError::Authorization(
            "There is at least one participant to be verified is null.".to_string(),
        ));
    };
    if invoking.fully_qualified() != required.fully_qualified() {
        return Err(LedgerError::Authorization(format!(
            "The participants {invoking} - {required} are not matched."
        )));
    }
    Ok(invoking.clone())
}

/// Confirms that a participant is present and is a bike user.
pub fn authorize_renter(participant: Option<&ParticipantRef>) -> Result<UserId> {
    let participant = participant.ok_or_else(|| {
        LedgerError::Authorization("No participant is renting the bike.".to_string())
    })?;
    participant.user_id().ok_or_else(|| {
        LedgerError::Authorization(format!("{participant} is not a bike user."))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_participants_are_confirmed() {
        let provider = ParticipantRef::provider("P1");
        let confirmed = check_participant(Some(&provider), Some(&provider.clone())).unwrap();
        assert_eq!(confirmed, provider);
    }

    #[test]
    fn test_absent_participant_is_rejected() {
        let provider = ParticipantRef::provider("P1");
        assert!(matches!(
            check_participant(None, Some(&provider)),
            Err(LedgerError::Authorization(_))
        ));
        assert!(matches!(
            check_participant(Some(&provider), None),
            Err(LedgerError::Authorization(_))
        ));
        assert!(matches!(
            check_participant(None, None),
            Err(LedgerError::Authorization(_))
        ));
    }

    #[test]
    fn test_mismatched_participants_are_rejected() {
        let result = check_participant(
            Some(&ParticipantRef::provider("P2")),
            Some(&ParticipantRef::provider("P1")),
        );
        let Err(LedgerError::Authorization(message)) = result else {
            panic!("expected an authorization error");
        };
        assert!(message.contains("BikeProvider#P2"));
        assert!(message.contains("BikeProvider#P1"));
    }

    #[test]
    fn test_renter_must_be_a_bike_user() {
        assert_eq!(
            authorize_renter(Some(&ParticipantRef::user("U1"))).unwrap(),
            UserId::new("U1")
        );
        assert!(matches!(
            authorize_renter(Some(&ParticipantRef::provider("P1"))),
            Err(LedgerError::Authorization(_))
        ));
        assert!(matches!(
            authorize_renter(None),
            Err(LedgerError::Authorization(_))
        ));
    }
}
