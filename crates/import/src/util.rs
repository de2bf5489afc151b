/// Declares a function returning a lazily compiled, process-wide `Regex`.
macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static ::regex::Regex {
            static R: ::std::sync::OnceLock<::regex::Regex> = ::std::sync::OnceLock::new();
            R.get_or_init(|| ::regex::Regex::new($pat).expect("invalid regex"))
        }
    };
}

re!(re_whitespace, r"\s+");

/// Collapses every whitespace run to a single space and trims both ends.
pub fn collapse_whitespace(s: &str) -> String {
    re_whitespace().replace_all(s, " ").trim().to_string()
}
