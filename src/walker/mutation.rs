use derive_more::Display;

use crate::random::RandomSource;

/// Structural operation applied to a single directory during the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Mutation {
    /// Overwrite the second line of every file below the directory.
    #[display("modify contents")]
    ModifyContents,
    /// Add a `folder_new_<token>` sub-folder with a handful of files.
    #[display("grow structure")]
    GrowStructure,
    /// Drop the last two lines of every file below the directory.
    #[display("shrink contents")]
    ShrinkContents,
    /// Remove the directory and everything beneath it.
    #[display("delete subtree")]
    DeleteSubtree,
}

impl Mutation {
    /// All mutations, indexed by the value drawn from the random source.
    pub const ALL: [Mutation; 4] = [
        Mutation::ModifyContents,
        Mutation::GrowStructure,
        Mutation::ShrinkContents,
        Mutation::DeleteSubtree,
    ];

    /// Draws one mutation, uniform over [`Mutation::ALL`].
    pub fn select<S: RandomSource + ?Sized>(source: &mut S) -> Self {
        Self::ALL[source.below(Self::ALL.len())]
    }
}
