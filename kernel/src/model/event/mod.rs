use crate::model::id::{EventId, UserId};
use crate::model::user::{Attendee, EventCreator};
use chrono::{DateTime, Utc};
use shared::error::{AppError, AppResult};

pub mod event;

/// An event with its creator and attendees resolved to display fields.
/// `attendees` is kept in join order.
#[derive(Debug, Clone)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub category: String,
    pub capacity: i32,
    pub image_url: String,
    pub creator: EventCreator,
    pub attendees: Vec<Attendee>,
}

// Attendance transition rules. The repository applies these to the state it
// reads inside the same transaction as the write, so the capacity bound holds
// under concurrent joins as well.

pub fn check_join(attendees: &[UserId], capacity: i32, user_id: UserId) -> AppResult<()> {
    if attendees.contains(&user_id) {
        return Err(AppError::UnprocessableEntity(
            "Already joined this event".into(),
        ));
    }
    if attendees.len() >= capacity.max(0) as usize {
        return Err(AppError::UnprocessableEntity(
            "Event is at full capacity".into(),
        ));
    }
    Ok(())
}

pub fn check_leave(attendees: &[UserId], user_id: UserId) -> AppResult<()> {
    if !attendees.contains(&user_id) {
        return Err(AppError::UnprocessableEntity(
            "Not attending this event".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn users(n: usize) -> Vec<UserId> {
        (0..n).map(|_| UserId::new()).collect()
    }

    #[test]
    fn join_fills_up_to_capacity_then_rejects() {
        let capacity = 2;
        let mut attendees: Vec<UserId> = Vec::new();
        let [a, b, c] = [UserId::new(), UserId::new(), UserId::new()];

        check_join(&attendees, capacity, a).unwrap();
        attendees.push(a);
        check_join(&attendees, capacity, b).unwrap();
        attendees.push(b);

        let err = check_join(&attendees, capacity, c).unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
        assert_eq!(attendees, vec![a, b]);
    }

    #[test]
    fn joining_twice_is_rejected() {
        let attendees = users(1);
        let err = check_join(&attendees, 10, attendees[0]).unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
    }

    #[test]
    fn leaving_without_attending_is_rejected() {
        let attendees = users(2);
        let err = check_leave(&attendees, UserId::new()).unwrap_err();
        assert!(matches!(err, AppError::UnprocessableEntity(_)));
    }

    #[test]
    fn join_then_leave_restores_the_original_state() {
        let mut attendees = users(2);
        let before = attendees.clone();
        let newcomer = UserId::new();

        check_join(&attendees, 5, newcomer).unwrap();
        attendees.push(newcomer);
        check_leave(&attendees, newcomer).unwrap();
        attendees.retain(|id| *id != newcomer);

        assert_eq!(attendees, before);
    }

    #[rstest]
    #[case(0, 0)]
    #[case(0, -1)]
    #[case(3, 3)]
    fn full_or_degenerate_capacity_rejects_join(#[case] joined: usize, #[case] capacity: i32) {
        let attendees = users(joined);
        assert!(check_join(&attendees, capacity, UserId::new()).is_err());
    }

    #[test]
    fn leave_preserves_the_order_of_the_rest() {
        let mut attendees = users(3);
        let (first, middle, last) = (attendees[0], attendees[1], attendees[2]);

        check_leave(&attendees, middle).unwrap();
        attendees.retain(|id| *id != middle);

        assert_eq!(attendees, vec![first, last]);
    }
}
