/// Data layer: core types and loading.
///
/// Architecture:
/// ```text
///  .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Signal
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Signal   │  timestamps + values, immutable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ ActiveView│  bounded prefix handed to the smoothing engine
///   └──────────┘
/// ```
pub mod loader;
pub mod model;
