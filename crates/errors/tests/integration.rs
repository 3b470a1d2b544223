//! Integration tests for error types

#[cfg(test)]
mod tests {
    use canopy_errors::*;

    #[test]
    fn test_error_conversion() {
        let slot_err = SlotError::NoSuchSlot {
            name: "footer".into(),
        };
        let err: Error = slot_err.into();
        assert!(matches!(err, Error::Slot(_)));
    }

    #[test]
    fn test_slot_errors_are_distinct() {
        let assign = SlotError::UnknownSlot {
            name: "noslotlikethis".into(),
            view: "viewname".into(),
        };
        let lookup = SlotError::NoSuchSlot {
            name: "noslotlikethis".into(),
        };
        assert!(assign.is_configuration());
        assert!(!lookup.is_configuration());
        assert_ne!(assign.user_code(), lookup.user_code());
    }

    #[test]
    fn test_error_display() {
        let err = ContentError::NameConflict {
            parent: 1,
            name: "about".into(),
        };
        assert_eq!(err.to_string(), "'about' already exists in node 1");
    }

    #[test]
    fn test_user_facing_delegates() {
        let err: Error = ViewError::NotFound {
            view: "foo".into(),
        }
        .into();
        assert_eq!(err.user_code(), Some("view.not_found"));
        assert!(err.user_hint().is_some());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_error_clone() {
        let err = PrincipalError::AlreadyExists {
            name: "bob".into(),
        };
        let cloned = err.clone();
        assert_eq!(err.to_string(), cloned.to_string());
    }
}
