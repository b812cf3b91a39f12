//! Persistent cache volumes
//!
//! The Zig global cache is mounted from a named volume whose lifecycle is
//! owned by the container engine. zigbox only creates it on first use.
//!
//! | Variant | Volume | Mount path |
//! |---------|--------|------------|
//! | root | `root-zig-cache` | `/root/.cache/zig` |
//! | user `zig` | `zig-zig-cache` | `/home/zig/.cache/zig` |

pub mod volume;

pub use volume::{labels, CacheVolume};
