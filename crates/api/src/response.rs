//! The `{ "data": ... }` wrapper used by every list, summary and dashboard
//! response. Single created or updated rows are returned bare.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
