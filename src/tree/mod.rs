//! Bootstrap of the synthetic tree: base folder, category folders and
//! placeholder files.

mod tree_builder;

pub use tree_builder::{
    CATEGORY_FOLDERS, LINES_PER_FILE, TreeError, create_file, create_sub_folder, initialize_tree,
};
