pub mod batch;
pub mod column_substitution;
pub mod constant_folder;
pub mod entity_substitution;
pub mod field_collector;
pub mod pretty_printer;

pub use batch::rewrite_parallel;
pub use column_substitution::ColumnSubstitution;
pub use constant_folder::ConstantFolder;
pub use entity_substitution::EntitySubstitution;
pub use field_collector::{FieldCollector, FieldKind, FieldRef};
pub use pretty_printer::PrettyPrinter;
