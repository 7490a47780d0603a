pub mod io;
pub mod kpi;
pub mod metric;
pub mod polars_ext;
pub mod ranking;
