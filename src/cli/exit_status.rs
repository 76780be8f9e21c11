/// Exit status of the test process.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ExitStatus(pub(crate) i32);

impl ExitStatus {
    pub(crate) const OK: Self = Self(0);
    pub(crate) const FAILED: Self = Self(101);

    pub(crate) fn from_passed(passed: bool) -> Self {
        if passed {
            Self::OK
        } else {
            Self::FAILED
        }
    }

    /// Return the raw exit code.
    #[inline]
    pub fn code(self) -> i32 {
        self.0
    }

    /// Terminate the test process with the exit code.
    #[inline]
    pub fn exit(self) -> ! {
        std::process::exit(self.code());
    }
}
