/// Config of a registered type
/// ## Fields
/// - `cache_provides`:
///   If `true`, an instance of a type marked shared in its dependency spec is cached and reused.
///
///   If `false`, the type is constructed on every request even when it's marked shared.
///   Only the final result is affected, the dependencies of the instance keep their own rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub cache_provides: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self { cache_provides: true }
    }
}
