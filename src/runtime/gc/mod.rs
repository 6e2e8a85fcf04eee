pub mod codec;
pub mod gc_handle;
pub mod gc_heap;
pub mod heap_object;
pub mod leb128;
pub mod weak_ref;

pub use gc_handle::Handle;
pub use gc_heap::{CollectStats, GcHeap};
pub use heap_object::{ObjectView, PayloadLimits, Tag};
pub use weak_ref::WeakRef;
