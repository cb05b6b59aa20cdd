// Collection state machine
// Plans the EMPTY <-> FULL transition for one sensor, given the sensor
// row, its active (status=true) log entry, and whether any log history
// exists at all

use uuid::Uuid;

use crate::entities::{BinEvent, Sensor};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionPlan {
    /// Append a full-event with no RFID and mark the sensor full.
    OpenCollection,
    /// Flip the named event to empty, mark the sensor empty, settle.
    CloseCollection { event_id: Uuid },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// The sensor already reports the requested state. Retried hardware
    /// signals must not silently skip the RFID precondition, so this is
    /// rejected rather than ignored.
    AlreadyInState { status: bool },
    /// An open event exists; a new collection cannot start while one is
    /// unresolved.
    CollectionOpen,
    /// FULL -> EMPTY requested before a collector tapped in (or before
    /// any collection was ever opened).
    RfidNotScanned,
}

impl TransitionError {
    pub fn reason(&self) -> String {
        match self {
            TransitionError::AlreadyInState { status: true } => {
                "sensor already reports full".to_string()
            }
            TransitionError::AlreadyInState { status: false } => {
                "sensor already reports empty".to_string()
            }
            TransitionError::CollectionOpen => {
                "a collection is already open for this sensor".to_string()
            }
            TransitionError::RfidNotScanned => {
                "RFID not scanned for current active log".to_string()
            }
        }
    }
}

pub fn plan_status_transition(
    sensor: &Sensor,
    active_event: Option<&BinEvent>,
    has_history: bool,
    desired: bool,
) -> Result<TransitionPlan, TransitionError> {
    if desired {
        if sensor.sensor_status {
            return Err(TransitionError::AlreadyInState { status: true });
        }
        // The sensor row and the log can only disagree if a previous
        // write was torn; refuse to stack a second open collection.
        if active_event.is_some() {
            return Err(TransitionError::CollectionOpen);
        }
        return Ok(TransitionPlan::OpenCollection);
    }
    match active_event {
        Some(event) if event.rfid.is_some() => Ok(TransitionPlan::CloseCollection {
            event_id: event.id,
        }),
        Some(_) => Err(TransitionError::RfidNotScanned),
        // A sensor with no log at all never had a collection to close;
        // that is a missing precondition, not a redundant signal.
        None if sensor.sensor_status || !has_history => Err(TransitionError::RfidNotScanned),
        None => Err(TransitionError::AlreadyInState { status: false }),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn sensor(status: bool) -> Sensor {
        Sensor {
            sensor_id: "Bin1".to_string(),
            sensor_name: "Bin 1".to_string(),
            location: "Market Rd".to_string(),
            company_id: Some(1),
            sensor_status: status,
        }
    }

    fn event(status: bool, rfid: Option<&str>) -> BinEvent {
        BinEvent {
            id: Uuid::new_v4(),
            sensor_id: "Bin1".to_string(),
            sensor_status: status,
            rfid: rfid.map(ToString::to_string),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn empty_to_full_opens_a_collection() {
        let plan = plan_status_transition(&sensor(false), None, false, true).expect("plan");
        assert_eq!(plan, TransitionPlan::OpenCollection);
    }

    #[test]
    fn redundant_full_signal_is_rejected() {
        let err = plan_status_transition(&sensor(true), Some(&event(true, None)), true, true)
            .expect_err("reject");
        assert_eq!(err, TransitionError::AlreadyInState { status: true });
    }

    #[test]
    fn redundant_empty_signal_after_a_cycle_is_rejected() {
        let err = plan_status_transition(&sensor(false), None, true, false).expect_err("reject");
        assert_eq!(err, TransitionError::AlreadyInState { status: false });
    }

    #[test]
    fn empty_signal_without_any_history_is_a_missing_precondition() {
        let err = plan_status_transition(&sensor(false), None, false, false).expect_err("reject");
        assert_eq!(err, TransitionError::RfidNotScanned);
    }

    #[test]
    fn stacked_open_collection_is_rejected() {
        // Sensor row says empty but an unresolved event exists.
        let err = plan_status_transition(&sensor(false), Some(&event(true, None)), true, true)
            .expect_err("reject");
        assert_eq!(err, TransitionError::CollectionOpen);
    }

    #[test]
    fn full_to_empty_requires_an_attached_rfid() {
        let err = plan_status_transition(&sensor(true), Some(&event(true, None)), true, false)
            .expect_err("reject");
        assert_eq!(err, TransitionError::RfidNotScanned);

        let attached = event(true, Some("RFID-123"));
        let plan =
            plan_status_transition(&sensor(true), Some(&attached), true, false).expect("plan");
        assert_eq!(
            plan,
            TransitionPlan::CloseCollection {
                event_id: attached.id
            }
        );
    }

    #[test]
    fn full_sensor_with_no_active_event_cannot_close() {
        let err = plan_status_transition(&sensor(true), None, true, false).expect_err("reject");
        assert_eq!(err, TransitionError::RfidNotScanned);
    }
}
