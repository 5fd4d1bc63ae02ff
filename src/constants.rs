// src/constants.rs
//! Domain constants that define the operational boundaries of the system.

/// How many objects the Notion API returns per page of results.
///
/// The Notion API maximum is 100. We use the maximum to minimize
/// round-trips while paginating database queries and block listings.
pub const NOTION_API_PAGE_SIZE: u32 = 100;

/// Estimated characters per block, used to pre-allocate output strings.
///
/// This is a performance hint, not a constraint. Over-estimating wastes
/// a little memory; under-estimating causes reallocation.
pub const CHARS_PER_BLOCK_ESTIMATE: usize = 256;
