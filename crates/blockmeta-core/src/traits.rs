//! The element-type capability consulted by the layout codec.

/// Opaque description of an array's element type.
///
/// Externally owned. The codec only ever asks one question of it and
/// never caches the answer: every encode or decode call re-queries.
/// Implementations should report `true` only for composite (record)
/// types that define a destructor; scalars, pointers, and records
/// without one report `false`.
pub trait TypeDescriptor {
    /// Whether elements of this type need destruction when the array dies.
    fn has_destructor(&self) -> bool;
}

impl<T: TypeDescriptor + ?Sized> TypeDescriptor for &T {
    fn has_destructor(&self) -> bool {
        (**self).has_destructor()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dtor(bool);

    impl TypeDescriptor for Dtor {
        fn has_destructor(&self) -> bool {
            self.0
        }
    }

    #[test]
    fn reference_forwards() {
        let d = Dtor(true);
        let r: &dyn TypeDescriptor = &d;
        assert!((&r).has_destructor());
        assert!(!(&Dtor(false)).has_destructor());
    }
}
