/// Marker for types that can be registered as components.
///
/// Carries no behavior, it only restricts what a [`World`](crate::World) accepts.
/// Implement it with `#[derive(Component)]`.
pub trait Component: 'static {}
