//! Fleet data model and the filter/sort/derive pipeline that turns raw
//! machine records into what the renderers display.

pub mod filter;
pub mod record;
pub mod sort;
pub mod status;
pub mod view;

pub use filter::{FilterCriteria, IssueKind, os_options};
pub use record::{CheckKind, MachineRecord, decode_list};
pub use sort::{SortColumn, SortDirection, SortState};
pub use status::{CheckOutcome, MachineStatus};
pub use view::{
    CARD_ID_LEN, FleetStats, ViewMode, build_view, count_label, format_datetime, format_relative,
    truncate_id,
};
