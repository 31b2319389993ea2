//! Matrix module: the logical matrix type and its storage backends.

pub mod base;
pub mod dense;
pub mod display;
pub mod iter;
pub mod names;
pub mod readonly;
pub mod serial;
pub mod sparse;
pub mod storage;
pub mod view;

pub use base::Matrix;
pub use dense::{DenseStorage, StorageOrder};
pub use iter::{Elements, MatrixCursor, RowChanged, RowView, Rows, SubscriptionId};
pub use names::AxisNames;
pub use readonly::ReadOnlyMatrix;
pub use sparse::SparseStorage;
pub use storage::{Storage, StorageScheme};
pub use view::ViewStorage;
