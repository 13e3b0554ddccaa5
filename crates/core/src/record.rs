use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

use crate::error::InvalidPageRequest;

pub type RecordId = u64;

/// A post as returned by the remote collection endpoint.
///
/// Unknown fields (e.g. `userId`) are ignored when decoding.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    pub id: RecordId,
    pub title: String,
    pub body: String,
}

/// One page of the remote collection, 1-indexed.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    page_number: u32,
    page_size: u32,
}

impl PageRequest {
    pub fn new(page_number: u32, page_size: u32) -> Result<Self, InvalidPageRequest> {
        if page_number == 0 {
            return Err(InvalidPageRequest::PageNumber);
        }
        if page_size == 0 {
            return Err(InvalidPageRequest::PageSize);
        }

        Ok(PageRequest {
            page_number,
            page_size,
        })
    }

    pub fn first(page_size: NonZeroU32) -> Self {
        PageRequest {
            page_number: 1,
            page_size: page_size.get(),
        }
    }

    pub(crate) fn numbered(page_number: u32, page_size: NonZeroU32) -> Self {
        PageRequest {
            page_number: page_number.max(1),
            page_size: page_size.get(),
        }
    }

    /// The request following this one, with the same page size.
    pub fn next(&self) -> Self {
        PageRequest {
            page_number: self.page_number.saturating_add(1),
            page_size: self.page_size,
        }
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }
}
