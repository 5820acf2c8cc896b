//! Page plan types

/// One bounded search request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// 1-based page number, used for progress logging
    pub number: u64,
    /// Offset of the first issue (`startAt`)
    pub start_at: u64,
    /// Number of issues requested (`maxResults`)
    pub max_results: u64,
}

/// How a query is split into search requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagePlan {
    /// Offsets `0, page_size, 2 * page_size, ..` covering `[0, total)`
    Full { total: u64, page_size: u64 },
    /// A single request of at most `limit` issues, no probe
    Preview { limit: u64 },
}

impl PagePlan {
    /// Plan covering every matching issue; a zero page size is treated as one
    pub fn full(total: u64, page_size: u64) -> Self {
        Self::Full {
            total,
            page_size: page_size.max(1),
        }
    }

    /// Single-request plan; a zero limit is treated as one
    pub fn preview(limit: u64) -> Self {
        Self::Preview {
            limit: limit.max(1),
        }
    }

    /// Number of requests the plan issues
    pub fn page_count(&self) -> u64 {
        match *self {
            Self::Full { total, page_size } => total.div_ceil(page_size.max(1)),
            Self::Preview { .. } => 1,
        }
    }

    /// Sum of the `max_results` of every page
    pub fn expected_results(&self) -> u64 {
        match *self {
            Self::Full { total, .. } => total,
            Self::Preview { limit } => limit,
        }
    }

    /// Lazy sequence of pages; each call starts from the beginning
    pub fn pages(&self) -> Pages {
        match *self {
            Self::Full { total, page_size } => Pages {
                next_start: 0,
                end: total,
                page_size: page_size.max(1),
                number: 0,
            },
            Self::Preview { limit } => Pages {
                next_start: 0,
                end: limit,
                page_size: limit,
                number: 0,
            },
        }
    }
}

/// Iterator over the pages of a [`PagePlan`]
#[derive(Debug, Clone)]
pub struct Pages {
    next_start: u64,
    end: u64,
    page_size: u64,
    number: u64,
}

impl Iterator for Pages {
    type Item = Page;

    fn next(&mut self) -> Option<Page> {
        if self.next_start >= self.end {
            return None;
        }

        let start_at = self.next_start;
        let max_results = self.page_size.min(self.end - start_at);
        self.next_start = start_at + self.page_size;
        self.number += 1;

        Some(Page {
            number: self.number,
            start_at,
            max_results,
        })
    }
}
