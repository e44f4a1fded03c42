//! Macros for last-resort debugging.
//!
//! Errors are located by decode path and offset, which tells you where in
//! the data things went wrong but not where in the code. To remedy this
//! somewhat, this module contains a macro `xerr!()` that logs the source
//! location at trace level before resolving into whatever the expression
//! it encloses resolves to. Use it whenever you initially produce an
//! error, i.e.:
//!
//! ```rust,ignore
//! if foo {
//!     xerr!(return Err(Error::decode("leading zeros")));
//! }
//! ```

macro_rules! xerr {
    ($test:expr) => {{
        log::trace!(
            "error produced at {}:{}", module_path!(), line!()
        );
        $test
    }}
}
