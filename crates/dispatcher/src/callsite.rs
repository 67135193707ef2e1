//! Call-site resolution
//!
//! Two ways to attribute a log call to the code that issued it:
//!
//! - the logging macros capture module path, function and line at compile
//!   time and hand them over explicitly (exact, free at runtime);
//! - [`CallerResolver`] walks the stack at runtime and returns the first
//!   frame outside the dispatcher and sink implementation. This is best
//!   effort: stripped or heavily inlined builds may yield `None`, which
//!   renders as the `?.?:?` placeholder rather than an error.

use std::borrow::Cow;

use contracts::CallSite;

/// Symbol prefixes treated as dispatcher/sink internals
pub const INTERNAL_PREFIXES: &[&str] = &[
    "backtrace::",
    "std::",
    "core::",
    "alloc::",
    "contracts::",
    "dispatcher::",
    "<contracts::",
    "<dispatcher::",
    "<alloc::",
    "<core::",
    "<std::",
    "__rust",
    "rust_begin_unwind",
];

const CLOSURE_SUFFIX: &str = "::{{closure}}";

/// Runtime stack walker returning the first external frame
#[derive(Debug, Clone)]
pub struct CallerResolver {
    internal: Vec<Cow<'static, str>>,
}

impl Default for CallerResolver {
    fn default() -> Self {
        Self {
            internal: INTERNAL_PREFIXES.iter().map(|p| Cow::Borrowed(*p)).collect(),
        }
    }
}

impl CallerResolver {
    /// Resolver skipping the given symbol prefixes instead of the defaults
    pub fn with_internal_prefixes<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        Self {
            internal: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether a demangled symbol path belongs to the logging internals
    pub fn is_internal(&self, path: &str) -> bool {
        self.internal.iter().any(|p| path.starts_with(p.as_ref()))
    }

    /// Walk the current stack outward and return the first external frame.
    ///
    /// File and line are looked up only when `with_line` is set.
    pub fn resolve(&self, with_line: bool) -> Option<CallSite> {
        let mut found: Option<CallSite> = None;
        backtrace::trace(|frame| {
            backtrace::resolve_frame(frame, |symbol| {
                if found.is_some() {
                    return;
                }
                let Some(name) = symbol.name() else {
                    return;
                };
                // `{:#}` drops the trailing `::h<hash>`
                let path = format!("{name:#}");
                if self.is_internal(&path) {
                    return;
                }
                let mut site = CallSite::from_path(strip_closures(&path));
                if with_line {
                    if let (Some(file), Some(line)) = (symbol.filename(), symbol.lineno()) {
                        site = site.with_location(file.display().to_string(), line);
                    }
                }
                found = Some(site);
            });
            found.is_none()
        });
        found
    }
}

/// `a::b::f::{{closure}}::{{closure}}` -> `a::b::f`
pub fn strip_closures(mut path: &str) -> &str {
    while let Some(stripped) = path.strip_suffix(CLOSURE_SUFFIX) {
        path = stripped;
    }
    path
}

/// Build a call site from a `type_name`-style function path. Used by the
/// logging macros.
pub fn site_from_function_path(path: &'static str, file: &'static str, line: u32) -> CallSite {
    let path = strip_closures(path);
    match path.rfind("::") {
        Some(i) => CallSite::new_static(&path[..i], &path[i + 2..], file, line),
        None => CallSite::new_static("?", path, file, line),
    }
}

/// Call site of the enclosing function, captured at compile time
#[macro_export]
macro_rules! call_site {
    () => {{
        fn __here() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        let path = __type_name_of(__here);
        $crate::callsite::site_from_function_path(
            path.strip_suffix("::__here").unwrap_or(path),
            file!(),
            line!(),
        )
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prefixes_cover_internals() {
        let resolver = CallerResolver::default();
        assert!(resolver.is_internal("dispatcher::dispatcher::Dispatcher::log"));
        assert!(resolver.is_internal(
            "<dispatcher::sink::Sink as contracts::sink::EventSink>::render"
        ));
        assert!(resolver.is_internal("std::rt::lang_start"));
        assert!(!resolver.is_internal("my_app::server::handle"));
    }

    #[test]
    fn test_strip_closures() {
        assert_eq!(strip_closures("app::run::{{closure}}::{{closure}}"), "app::run");
        assert_eq!(strip_closures("app::run"), "app::run");
    }

    #[test]
    fn test_macro_captures_enclosing_function() {
        let site = call_site!();
        assert_eq!(site.scope, "dispatcher::callsite::tests");
        assert_eq!(site.member, "test_macro_captures_enclosing_function");
        assert_eq!(site.file.as_deref(), Some(file!()));
        assert!(site.line.is_some());
    }

    #[test]
    fn test_macro_inside_closure_reports_function() {
        let site = (|| call_site!())();
        assert_eq!(site.member, "test_macro_inside_closure_reports_function");
    }

    #[inline(never)]
    fn resolve_from_here(resolver: &CallerResolver) -> Option<CallSite> {
        resolver.resolve(true)
    }

    #[test]
    fn test_runtime_walk_skips_configured_prefixes() {
        let resolver = CallerResolver::with_internal_prefixes([
            "backtrace::",
            "dispatcher::callsite::CallerResolver",
            "<dispatcher::callsite::CallerResolver",
        ]);
        // Best effort: without symbols there is nothing to check.
        if let Some(site) = resolve_from_here(&resolver) {
            assert_eq!(site.scope, "dispatcher::callsite::tests");
            assert_eq!(site.member, "resolve_from_here");
            assert!(site.line.is_some());
        }
    }

    #[test]
    fn test_runtime_walk_never_returns_internal_frames() {
        let resolver = CallerResolver::default();
        // Every frame of this test lives in `dispatcher::` or the std test
        // harness, so anything found must come from outside both.
        if let Some(site) = resolver.resolve(false) {
            let path = format!("{}::{}", site.scope, site.member);
            assert!(!resolver.is_internal(&path), "{path}");
            assert!(site.line.is_none());
        }
    }
}
