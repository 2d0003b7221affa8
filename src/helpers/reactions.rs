use serde::Serialize;

/// Per-(video, user) reaction state is one of neutral (no row), liked, or
/// disliked. The two reactor sets are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    Like,
    Dislike,
}

impl Reaction {
    pub fn as_str(self) -> &'static str {
        match self {
            Reaction::Like => "LIKE",
            Reaction::Dislike => "DISLIKE",
        }
    }

    pub fn from_str(value: &str) -> Option<Reaction> {
        match value {
            "LIKE" => Some(Reaction::Like),
            "DISLIKE" => Some(Reaction::Dislike),
            _ => None,
        }
    }
}

/// How the membership row for the acting user must change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipChange {
    Insert,
    Remove,
    Retype,
}

/// The full effect of one toggle call: the membership operation, the counter
/// deltas to apply alongside it, and the acting user's resulting state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TogglePlan {
    pub membership: MembershipChange,
    pub like_delta: i32,
    pub dislike_delta: i32,
    pub is_liked: bool,
    pub is_disliked: bool,
}

/// Decides the transition for a reaction request. Repeating the current
/// reaction undoes it; the opposite reaction swaps without double-counting;
/// from neutral the requested reaction is added.
pub fn plan_toggle(current: Option<Reaction>, requested: Reaction) -> TogglePlan {
    match current {
        Some(existing) if existing == requested => TogglePlan {
            membership: MembershipChange::Remove,
            like_delta: if requested == Reaction::Like { -1 } else { 0 },
            dislike_delta: if requested == Reaction::Dislike { -1 } else { 0 },
            is_liked: false,
            is_disliked: false,
        },
        Some(_) => TogglePlan {
            membership: MembershipChange::Retype,
            like_delta: if requested == Reaction::Like { 1 } else { -1 },
            dislike_delta: if requested == Reaction::Dislike { 1 } else { -1 },
            is_liked: requested == Reaction::Like,
            is_disliked: requested == Reaction::Dislike,
        },
        None => TogglePlan {
            membership: MembershipChange::Insert,
            like_delta: if requested == Reaction::Like { 1 } else { 0 },
            dislike_delta: if requested == Reaction::Dislike { 1 } else { 0 },
            is_liked: requested == Reaction::Like,
            is_disliked: requested == Reaction::Dislike,
        },
    }
}

/// What the toggle endpoints return to the client.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionSnapshot {
    pub likes: i32,
    pub dislikes: i32,
    pub is_liked: bool,
    pub is_disliked: bool,
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    /// In-memory stand-in for one video's reaction state, applying plans the
    /// same way the handler applies them to the store.
    struct SimVideo {
        likes: i32,
        dislikes: i32,
        liked_by: HashSet<i32>,
        disliked_by: HashSet<i32>,
    }

    impl SimVideo {
        fn new() -> SimVideo {
            SimVideo {
                likes: 0,
                dislikes: 0,
                liked_by: HashSet::new(),
                disliked_by: HashSet::new(),
            }
        }

        fn current(&self, user_id: i32) -> Option<Reaction> {
            if self.liked_by.contains(&user_id) {
                Some(Reaction::Like)
            } else if self.disliked_by.contains(&user_id) {
                Some(Reaction::Dislike)
            } else {
                None
            }
        }

        fn apply(&mut self, user_id: i32, requested: Reaction) -> TogglePlan {
            let plan = plan_toggle(self.current(user_id), requested);

            match plan.membership {
                MembershipChange::Insert | MembershipChange::Retype => {
                    self.liked_by.remove(&user_id);
                    self.disliked_by.remove(&user_id);
                    match requested {
                        Reaction::Like => self.liked_by.insert(user_id),
                        Reaction::Dislike => self.disliked_by.insert(user_id),
                    };
                }
                MembershipChange::Remove => {
                    self.liked_by.remove(&user_id);
                    self.disliked_by.remove(&user_id);
                }
            }

            self.likes += plan.like_delta;
            self.dislikes += plan.dislike_delta;
            plan
        }

        fn assert_invariants(&self) {
            assert!(self.liked_by.is_disjoint(&self.disliked_by));
            assert_eq!(self.likes, self.liked_by.len() as i32);
            assert_eq!(self.dislikes, self.disliked_by.len() as i32);
        }
    }

    #[test]
    fn neutral_to_like_adds_membership() {
        let plan = plan_toggle(None, Reaction::Like);
        assert_eq!(plan.membership, MembershipChange::Insert);
        assert_eq!((plan.like_delta, plan.dislike_delta), (1, 0));
        assert!(plan.is_liked);
        assert!(!plan.is_disliked);
    }

    #[test]
    fn neutral_to_dislike_adds_membership() {
        let plan = plan_toggle(None, Reaction::Dislike);
        assert_eq!(plan.membership, MembershipChange::Insert);
        assert_eq!((plan.like_delta, plan.dislike_delta), (0, 1));
        assert!(!plan.is_liked);
        assert!(plan.is_disliked);
    }

    #[test]
    fn repeating_a_reaction_undoes_it() {
        let plan = plan_toggle(Some(Reaction::Like), Reaction::Like);
        assert_eq!(plan.membership, MembershipChange::Remove);
        assert_eq!((plan.like_delta, plan.dislike_delta), (-1, 0));
        assert!(!plan.is_liked);
        assert!(!plan.is_disliked);

        let plan = plan_toggle(Some(Reaction::Dislike), Reaction::Dislike);
        assert_eq!(plan.membership, MembershipChange::Remove);
        assert_eq!((plan.like_delta, plan.dislike_delta), (0, -1));
    }

    #[test]
    fn opposite_reaction_swaps_without_double_counting() {
        let plan = plan_toggle(Some(Reaction::Like), Reaction::Dislike);
        assert_eq!(plan.membership, MembershipChange::Retype);
        assert_eq!((plan.like_delta, plan.dislike_delta), (-1, 1));
        assert!(!plan.is_liked);
        assert!(plan.is_disliked);

        let plan = plan_toggle(Some(Reaction::Dislike), Reaction::Like);
        assert_eq!(plan.membership, MembershipChange::Retype);
        assert_eq!((plan.like_delta, plan.dislike_delta), (1, -1));
    }

    #[test]
    fn like_dislike_dislike_scenario() {
        let mut video = SimVideo::new();
        let user_b = 2;

        let plan = video.apply(user_b, Reaction::Like);
        video.assert_invariants();
        assert_eq!((video.likes, video.dislikes), (1, 0));
        assert!(plan.is_liked && !plan.is_disliked);

        let plan = video.apply(user_b, Reaction::Dislike);
        video.assert_invariants();
        assert_eq!((video.likes, video.dislikes), (0, 1));
        assert!(!plan.is_liked && plan.is_disliked);

        let plan = video.apply(user_b, Reaction::Dislike);
        video.assert_invariants();
        assert_eq!((video.likes, video.dislikes), (0, 0));
        assert!(!plan.is_liked && !plan.is_disliked);
    }

    #[test]
    fn invariants_hold_over_arbitrary_sequences() {
        let mut video = SimVideo::new();

        // Deterministic but irregular walk across three users.
        let actions = [
            (1, Reaction::Like),
            (2, Reaction::Dislike),
            (1, Reaction::Like),
            (3, Reaction::Like),
            (2, Reaction::Like),
            (3, Reaction::Dislike),
            (1, Reaction::Dislike),
            (2, Reaction::Like),
            (3, Reaction::Dislike),
            (1, Reaction::Dislike),
        ];

        for (user_id, action) in actions {
            video.apply(user_id, action);
            video.assert_invariants();

            let in_liked = video.liked_by.contains(&user_id);
            let in_disliked = video.disliked_by.contains(&user_id);
            assert!(!(in_liked && in_disliked));
        }
    }

    #[test]
    fn reaction_type_round_trips() {
        assert_eq!(Reaction::from_str("LIKE"), Some(Reaction::Like));
        assert_eq!(Reaction::from_str("DISLIKE"), Some(Reaction::Dislike));
        assert_eq!(Reaction::from_str("UP"), None);
        assert_eq!(Reaction::Like.as_str(), "LIKE");
        assert_eq!(Reaction::Dislike.as_str(), "DISLIKE");
    }
}
