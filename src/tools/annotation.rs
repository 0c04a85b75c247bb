/// Sequence numbers for numbered annotations. Starts at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnotationCounter {
    next: u32,
}

impl Default for AnnotationCounter {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl AnnotationCounter {
    pub fn current(&self) -> u32 {
        self.next
    }

    /// Hand out the current number and advance.
    pub fn take(&mut self) -> u32 {
        let number = self.next;
        self.next += 1;
        number
    }

    pub fn reset(&mut self) {
        self.next = 1;
    }
}
