//! Stack of the type names being processed, attached to errors in debug builds.

#[cfg(all(debug_assertions, feature = "debug"))]
use alloc::vec::Vec;
use alloc::string::String;

#[derive(Default, Clone)]
pub(super) struct TypeTrace {
    #[cfg(all(debug_assertions, feature = "debug"))]
    stack: Vec<&'static str>,
}

impl TypeTrace {
    #[inline(always)]
    pub fn push(&mut self, _type_name: &'static str) {
        #[cfg(all(debug_assertions, feature = "debug"))]
        self.stack.push(_type_name);
    }

    #[inline(always)]
    pub fn pop(&mut self) {
        #[cfg(all(debug_assertions, feature = "debug"))]
        self.stack.pop();
    }

    /// Renders the stack, one type per line, outermost first.
    ///
    /// Empty when tracing is compiled out.
    pub fn render(&self) -> String {
        #[cfg(all(debug_assertions, feature = "debug"))]
        {
            use core::fmt::Write;

            let mut out = String::new();
            let mut iter = self.stack.iter();
            if let Some(first) = iter.next() {
                let _ = writeln!(out, "`{first}`");
            }
            for name in iter {
                let _ = writeln!(out, " -> `{name}`");
            }
            out
        }
        #[cfg(not(all(debug_assertions, feature = "debug")))]
        {
            String::new()
        }
    }
}

#[cfg(all(test, debug_assertions, feature = "debug"))]
mod tests {
    use super::TypeTrace;

    #[test]
    fn render_stack() {
        let mut trace = TypeTrace::default();
        assert_eq!(trace.render(), "");
        trace.push("game::Player");
        trace.push("game::Item");
        assert_eq!(trace.render(), "`game::Player`\n -> `game::Item`\n");
        trace.pop();
        assert_eq!(trace.render(), "`game::Player`\n");
    }
}
