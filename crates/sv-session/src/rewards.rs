//! The token reward table.
//!
//! Amounts are fixed per action; the UI never sets a balance directly, it
//! only routes one of these actions through
//! [`SessionStore::award_tokens`](crate::store::SessionStore::award_tokens).

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RewardAction {
    PostCreated,
    ReactionGiven,
    ReactionReceived,
    CommentPosted,
    CommentReactionGiven,
    CommentReactionReceived,
    CrisisSupportTagged,
    ContentModeratedHelpful,
    FirstPost,
    FirstReaction,
    WalletConnected,
    AnonymousEntry,
}

impl RewardAction {
    pub fn amount(self) -> u64 {
        match self {
            RewardAction::PostCreated => 10,
            RewardAction::ReactionGiven => 2,
            RewardAction::ReactionReceived => 1,
            RewardAction::CommentPosted => 5,
            RewardAction::CommentReactionGiven => 1,
            RewardAction::CommentReactionReceived => 1,
            RewardAction::CrisisSupportTagged => 50,
            RewardAction::ContentModeratedHelpful => 15,
            RewardAction::FirstPost => 25,
            RewardAction::FirstReaction => 5,
            RewardAction::WalletConnected => 100,
            RewardAction::AnonymousEntry => 50,
        }
    }

    /// Stable identifier used in logs and notification copy.
    pub fn slug(self) -> &'static str {
        match self {
            RewardAction::PostCreated => "post_created",
            RewardAction::ReactionGiven => "reaction_given",
            RewardAction::ReactionReceived => "reaction_received",
            RewardAction::CommentPosted => "comment_posted",
            RewardAction::CommentReactionGiven => "comment_reaction_given",
            RewardAction::CommentReactionReceived => "comment_reaction_received",
            RewardAction::CrisisSupportTagged => "crisis_support_tagged",
            RewardAction::ContentModeratedHelpful => "content_moderated_helpful",
            RewardAction::FirstPost => "first_post",
            RewardAction::FirstReaction => "first_reaction",
            RewardAction::WalletConnected => "wallet_connected",
            RewardAction::AnonymousEntry => "anonymous_entry",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_bonus_amounts() {
        assert_eq!(RewardAction::ReactionGiven.amount(), 2);
        assert_eq!(RewardAction::AnonymousEntry.amount(), 50);
        assert_eq!(RewardAction::WalletConnected.amount(), 100);
    }
}
