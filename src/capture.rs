//! Redirection of `print!`-style output during a run.
//!
//! The [`print!`](crate::print) and [`println!`](crate::println) macros
//! write to a thread-local sink while a redirect is installed and fall
//! through to the real standard output otherwise.

use std::cell::RefCell;
use std::fmt;
use std::io::{self, Write};

thread_local! {
    static SINK: RefCell<Option<Box<dyn Write>>> = RefCell::new(None);
}

/// Active redirection of this thread's captured output.
///
/// [`uninstall`](Redirect::uninstall) restores the previously installed
/// sink and hands the current one back. Dropping the guard restores the
/// previous sink as well, losing the current one.
pub(crate) struct Redirect {
    prev: Option<Box<dyn Write>>,
    restored: bool,
}

impl Redirect {
    pub(crate) fn install(sink: Box<dyn Write>) -> Self {
        let prev = SINK.with(|slot| slot.borrow_mut().replace(sink));
        Self {
            prev,
            restored: false,
        }
    }

    pub(crate) fn uninstall(mut self) -> Option<Box<dyn Write>> {
        self.restored = true;
        SINK.with(|slot| {
            let mut slot = slot.borrow_mut();
            let sink = slot.take();
            *slot = self.prev.take();
            sink
        })
    }
}

impl Drop for Redirect {
    fn drop(&mut self) {
        if !self.restored {
            SINK.with(|slot| {
                *slot.borrow_mut() = self.prev.take();
            });
        }
    }
}

#[doc(hidden)] // private API
pub fn write(args: fmt::Arguments<'_>) {
    SINK.with(|slot| match slot.borrow_mut().as_mut() {
        Some(sink) => {
            let _ = sink.write_fmt(args);
        }
        None => {
            let _ = io::stdout().write_fmt(args);
        }
    });
}

/// Prints to the captured output of the current run, or to the real
/// standard output when nothing is capturing.
///
/// Drop-in replacement for [`std::print!`] inside test and hook bodies.
#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => {
        $crate::capture::write(::std::format_args!($($arg)*))
    };
}

/// Prints to the captured output of the current run, with a newline.
///
/// Drop-in replacement for [`std::println!`] inside test and hook bodies.
#[macro_export]
macro_rules! println {
    () => {
        $crate::print!("\n")
    };
    ($($arg:tt)*) => {{
        $crate::capture::write(::std::format_args!($($arg)*));
        $crate::capture::write(::std::format_args!("\n"));
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct SharedBuf(Rc<RefCell<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.borrow()).into_owned()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn installed_sink_receives_the_output() {
        let buf = SharedBuf::default();
        let redirect = Redirect::install(Box::new(buf.clone()));
        crate::print!("hello");
        crate::println!(" {}", "capture");
        crate::println!();
        let sink = redirect.uninstall();
        assert!(sink.is_some());
        assert_eq!(buf.contents(), "hello capture\n\n");
    }

    #[test]
    fn redirects_nest() {
        let outer = SharedBuf::default();
        let inner = SharedBuf::default();
        let first = Redirect::install(Box::new(outer.clone()));
        {
            let second = Redirect::install(Box::new(inner.clone()));
            crate::println!("inner line");
            second.uninstall();
        }
        crate::println!("outer line");
        first.uninstall();

        assert_eq!(inner.contents(), "inner line\n");
        assert_eq!(outer.contents(), "outer line\n");
    }

    #[test]
    fn drop_restores_the_previous_sink() {
        let outer = SharedBuf::default();
        let first = Redirect::install(Box::new(outer.clone()));
        {
            let _second = Redirect::install(Box::new(SharedBuf::default()));
        }
        crate::println!("after drop");
        first.uninstall();

        assert_eq!(outer.contents(), "after drop\n");
    }
}
