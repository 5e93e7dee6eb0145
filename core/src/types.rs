/// Identity of a card within one dealt deck.
pub type CardId = u8;

/// Count type used for pair totals and matched pairs.
pub type PairCount = u8;

/// Remaining mismatches before the game is lost.
pub type Lives = u8;

/// Bumped on every successful deal so work scheduled against an older deck can be told apart.
pub type Generation = u32;
