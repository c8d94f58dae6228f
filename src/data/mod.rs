//! External data collaborators: holiday sources and the World Bank GDP API.

pub mod holidays;
pub mod worldbank;

pub use holidays::{
    CsvHolidaySource, HolidaySource, NagerClient, build_holiday_table, collect_raw_holidays,
};
pub use worldbank::WorldBankClient;
