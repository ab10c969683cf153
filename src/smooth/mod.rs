/// Smoothing layer: the method registry and the recomputation engine.
///
/// Architecture:
/// ```text
///   ┌──────────────┐
///   │   registry    │  six fixed MethodDescriptors (colour, enabled, params)
///   └──────────────┘
///        │ read on every cycle
///        ▼
///   ┌──────────────┐      ┌──────────────┐
///   │    engine     │ ───▶ │   methods    │  the six pure transforms
///   └──────────────┘      └──────────────┘
///        │
///        ▼
///   one Result series per enabled method, aligned with the ActiveView
/// ```
pub mod engine;
pub mod methods;
pub mod registry;
