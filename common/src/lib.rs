//! On Track Common Library
//!
//! CLIとHTTPサーバで共有される型と計算パイプライン

pub mod types;
pub mod swim_time;
pub mod score;
pub mod target;
pub mod sheet;
pub mod schema;
pub mod normalize;
pub mod alias;
pub mod foreign;
pub mod report;
pub mod sort;
pub mod assembler;
pub mod error;

pub use types::{Event, Gender, RawDate, RawRow, ResultRow, RowOrigin, Stroke};
pub use swim_time::SwimTime;
pub use score::{point_score, BaseTimes};
pub use target::TargetTable;
pub use sheet::is_result_sheet;
pub use schema::{ColumnRef, ColumnSchema, Field, ResolvedColumns};
pub use alias::{AliasTable, TeamResolution};
pub use foreign::{ForeignSwimmerSet, FOREIGN_MARKER};
pub use report::{Failure, FailureKind, TableReport, TableSummary};
pub use sort::{sort_rows, SortColumn, SortDirection, SortSpec};
pub use assembler::{assemble, assemble_row, keep_best_times, ReferenceData, RowOutcome, TableOptions};
pub use error::{Error, Result};
