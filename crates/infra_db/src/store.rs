//! PostgreSQL sales store
//!
//! This module implements the engine's transactional store ports on
//! PostgreSQL. A [`PgSalesStore`] wraps a connection pool; each unit of
//! work opened from it owns one database transaction, so nothing a unit
//! writes is visible until commit and a dropped unit rolls back.
//!
//! # Schema contract
//!
//! Table provisioning is handled by calling code. The store expects:
//!
//! * `bills` - bill headers, primary key `(company, bill_suffix)`
//! * `bill_lines` - bill lines, primary key `(company, bill_suffix, line_no)`
//! * `bill_staging` - displaced bills parked during renumbering, as JSONB
//!   payloads keyed by `(company, original_suffix)`
//! * `bill_sequences` - one row per company, locked `FOR UPDATE` to
//!   serialize bill number allocation
//! * `stock_balances` - cumulative stock, primary key `(company, item_code)`
//! * `stock_ledger` and `stock_ledger_YYYYMM` - month sheets, one row per
//!   `(company, item_code)` with the day cells as JSONB
//!
//! Which of the ledger tables backs a given month is resolved through
//! [`crate::month_table`]: the present calendar month reads and writes
//! the live table, every other month its own archived table.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::Postgres;
use sqlx::{FromRow, Transaction};
use tracing::{debug, instrument};

use core_kernel::{BillNo, CompanyId, DateRange, DayOfMonth, DomainPort, ItemCode, MonthKey, PortError};
use domain_ledger::{LedgerCell, MonthSheet, StockBalance};
use domain_sales::{Bill, BillHeader, BillLine, LiquorMode};
use sales_engine::{SalesStore, SalesUnit};

use crate::error::DatabaseError;
use crate::month_table::sheet_table;
use crate::pool::DatabasePool;

/// PostgreSQL-backed implementation of the engine's store ports
///
/// # Error Handling
///
/// Database errors are translated to `PortError` variants:
/// - `DatabaseError::DuplicateEntry` -> `PortError::Conflict`
/// - `DatabaseError::ConnectionFailed` / `PoolExhausted` -> `PortError::Connection`
/// - Other errors -> `PortError::Internal`
#[derive(Debug, Clone)]
pub struct PgSalesStore {
    pool: DatabasePool,
}

impl PgSalesStore {
    /// Creates a new store over the given connection pool
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Returns the underlying connection pool
    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    /// Verifies database connectivity with a trivial query
    ///
    /// # Errors
    ///
    /// Returns a `DatabaseError` if the database is unreachable.
    pub async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from(&e))?;
        Ok(())
    }
}

impl DomainPort for PgSalesStore {}

#[async_trait]
impl SalesStore for PgSalesStore {
    #[instrument(skip(self))]
    async fn begin(&self) -> Result<Box<dyn SalesUnit>, PortError> {
        let tx = self.pool.begin().await.map_err(map_db)?;
        let current_month = MonthKey::from_date(Utc::now().date_naive());
        debug!(%current_month, "Opened unit of work");

        Ok(Box::new(PgSalesUnit { tx, current_month }))
    }
}

/// One open database transaction serving a single run
///
/// The present calendar month is captured when the unit opens, so every
/// sheet access inside one run resolves tables against the same month.
pub struct PgSalesUnit {
    tx: Transaction<'static, Postgres>,
    current_month: MonthKey,
}

impl PgSalesUnit {
    async fn lines_for(
        &mut self,
        company: &CompanyId,
        bill_no: BillNo,
    ) -> Result<Vec<BillLine>, PortError> {
        let rows = sqlx::query_as::<_, BillLineRow>(
            "SELECT item_code, qty, rate, amount FROM bill_lines \
             WHERE company = $1 AND bill_suffix = $2 ORDER BY line_no",
        )
        .bind(company.as_str())
        .bind(i64::from(bill_no.suffix()))
        .fetch_all(&mut *self.tx)
        .await
        .map_err(map_db)?;

        rows.into_iter()
            .map(|row| row.into_line().map_err(db_to_port))
            .collect()
    }

    async fn assemble_bills(&mut self, headers: Vec<BillHeaderRow>) -> Result<Vec<Bill>, PortError> {
        let mut bills = Vec::with_capacity(headers.len());
        for row in headers {
            let header = row.into_header().map_err(db_to_port)?;
            let company = header.company.clone();
            let lines = self.lines_for(&company, header.bill_no).await?;
            bills.push(verified_bill(header, lines)?);
        }
        Ok(bills)
    }
}

#[async_trait]
impl SalesUnit for PgSalesUnit {
    #[instrument(skip(self), fields(company = %company))]
    async fn lock_bill_sequence(&mut self, company: &CompanyId) -> Result<(), PortError> {
        debug!("Locking bill sequence");

        // The guard row exists only to be locked; the first run for a
        // company creates it.
        sqlx::query("INSERT INTO bill_sequences (company) VALUES ($1) ON CONFLICT (company) DO NOTHING")
            .bind(company.as_str())
            .execute(&mut *self.tx)
            .await
            .map_err(map_db)?;

        sqlx::query("SELECT company FROM bill_sequences WHERE company = $1 FOR UPDATE")
            .bind(company.as_str())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_db)?;

        Ok(())
    }

    #[instrument(skip(self), fields(company = %company))]
    async fn max_bill_number(&mut self, company: &CompanyId) -> Result<Option<BillNo>, PortError> {
        let max: Option<i64> =
            sqlx::query_scalar("SELECT MAX(bill_suffix) FROM bills WHERE company = $1")
                .bind(company.as_str())
                .fetch_one(&mut *self.tx)
                .await
                .map_err(map_db)?;

        max.map(bill_no_from_suffix).transpose()
    }

    #[instrument(skip(self), fields(company = %company, bill_no = %bill_no))]
    async fn bill_exists(
        &mut self,
        company: &CompanyId,
        bill_no: BillNo,
    ) -> Result<bool, PortError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM bills WHERE company = $1 AND bill_suffix = $2)",
        )
        .bind(company.as_str())
        .bind(i64::from(bill_no.suffix()))
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_db)
    }

    #[instrument(skip(self, bill), fields(bill_no = %bill.bill_no(), lines = bill.lines.len()))]
    async fn insert_bill(&mut self, bill: &Bill) -> Result<(), PortError> {
        debug!("Inserting bill");

        sqlx::query(
            "INSERT INTO bills (company, bill_suffix, bill_date, mode, total_amount, discount, net_amount) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(bill.header.company.as_str())
        .bind(i64::from(bill.bill_no().suffix()))
        .bind(bill.header.date)
        .bind(bill.header.mode.code())
        .bind(bill.header.total_amount)
        .bind(bill.header.discount)
        .bind(bill.header.net_amount)
        .execute(&mut *self.tx)
        .await
        .map_err(map_db)?;

        for (index, line) in bill.lines.iter().enumerate() {
            sqlx::query(
                "INSERT INTO bill_lines (company, bill_suffix, line_no, item_code, qty, rate, amount) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(bill.header.company.as_str())
            .bind(i64::from(bill.bill_no().suffix()))
            .bind((index + 1) as i32)
            .bind(line.item.as_str())
            .bind(i64::from(line.qty))
            .bind(line.rate)
            .bind(line.amount)
            .execute(&mut *self.tx)
            .await
            .map_err(map_db)?;
        }

        Ok(())
    }

    #[instrument(skip(self), fields(company = %company, bill_no = %bill_no))]
    async fn load_bill(
        &mut self,
        company: &CompanyId,
        bill_no: BillNo,
    ) -> Result<Option<Bill>, PortError> {
        let header = sqlx::query_as::<_, BillHeaderRow>(
            "SELECT bill_suffix, bill_date, company, mode, total_amount, discount, net_amount \
             FROM bills WHERE company = $1 AND bill_suffix = $2",
        )
        .bind(company.as_str())
        .bind(i64::from(bill_no.suffix()))
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_db)?;

        let Some(row) = header else {
            return Ok(None);
        };

        let header = row.into_header().map_err(db_to_port)?;
        let lines = self.lines_for(company, bill_no).await?;
        Ok(Some(verified_bill(header, lines)?))
    }

    #[instrument(skip(self), fields(company = %company, bill_no = %bill_no))]
    async fn delete_bill(&mut self, company: &CompanyId, bill_no: BillNo) -> Result<(), PortError> {
        debug!("Deleting bill");

        sqlx::query("DELETE FROM bill_lines WHERE company = $1 AND bill_suffix = $2")
            .bind(company.as_str())
            .bind(i64::from(bill_no.suffix()))
            .execute(&mut *self.tx)
            .await
            .map_err(map_db)?;

        sqlx::query("DELETE FROM bills WHERE company = $1 AND bill_suffix = $2")
            .bind(company.as_str())
            .bind(i64::from(bill_no.suffix()))
            .execute(&mut *self.tx)
            .await
            .map_err(map_db)?;

        Ok(())
    }

    #[instrument(skip(self), fields(company = %company, above = %above))]
    async fn bills_above(
        &mut self,
        company: &CompanyId,
        above: BillNo,
    ) -> Result<Vec<Bill>, PortError> {
        let headers = sqlx::query_as::<_, BillHeaderRow>(
            "SELECT bill_suffix, bill_date, company, mode, total_amount, discount, net_amount \
             FROM bills WHERE company = $1 AND bill_suffix > $2 ORDER BY bill_suffix",
        )
        .bind(company.as_str())
        .bind(i64::from(above.suffix()))
        .fetch_all(&mut *self.tx)
        .await
        .map_err(map_db)?;

        self.assemble_bills(headers).await
    }

    #[instrument(skip(self, range), fields(company = %company))]
    async fn bills_in_range(
        &mut self,
        company: &CompanyId,
        range: DateRange,
    ) -> Result<Vec<Bill>, PortError> {
        let headers = sqlx::query_as::<_, BillHeaderRow>(
            "SELECT bill_suffix, bill_date, company, mode, total_amount, discount, net_amount \
             FROM bills WHERE company = $1 AND bill_date >= $2 AND bill_date <= $3 \
             ORDER BY bill_suffix",
        )
        .bind(company.as_str())
        .bind(range.start())
        .bind(range.end())
        .fetch_all(&mut *self.tx)
        .await
        .map_err(map_db)?;

        self.assemble_bills(headers).await
    }

    #[instrument(skip(self, bill), fields(bill_no = %bill.bill_no()))]
    async fn stage_bill(&mut self, bill: &Bill) -> Result<(), PortError> {
        debug!("Staging bill");

        let payload = serde_json::to_value(bill)
            .map_err(|e| db_to_port(DatabaseError::SerializationError(e.to_string())))?;

        sqlx::query(
            "INSERT INTO bill_staging (company, original_suffix, payload) VALUES ($1, $2, $3)",
        )
        .bind(bill.header.company.as_str())
        .bind(i64::from(bill.bill_no().suffix()))
        .bind(payload)
        .execute(&mut *self.tx)
        .await
        .map_err(map_db)?;

        Ok(())
    }

    #[instrument(skip(self), fields(company = %company))]
    async fn staged_bills(&mut self, company: &CompanyId) -> Result<Vec<Bill>, PortError> {
        let payloads = sqlx::query_scalar::<_, serde_json::Value>(
            "SELECT payload FROM bill_staging WHERE company = $1 ORDER BY original_suffix",
        )
        .bind(company.as_str())
        .fetch_all(&mut *self.tx)
        .await
        .map_err(map_db)?;

        payloads
            .into_iter()
            .map(|payload| {
                serde_json::from_value(payload)
                    .map_err(|e| db_to_port(DatabaseError::SerializationError(e.to_string())))
            })
            .collect()
    }

    #[instrument(skip(self), fields(company = %company))]
    async fn purge_staging(&mut self, company: &CompanyId) -> Result<(), PortError> {
        sqlx::query("DELETE FROM bill_staging WHERE company = $1")
            .bind(company.as_str())
            .execute(&mut *self.tx)
            .await
            .map_err(map_db)?;

        Ok(())
    }

    #[instrument(skip(self), fields(company = %company, item = %item))]
    async fn stock_balance(
        &mut self,
        company: &CompanyId,
        item: &ItemCode,
    ) -> Result<StockBalance, PortError> {
        let row = sqlx::query_as::<_, StockRow>(
            "SELECT opening, current FROM stock_balances WHERE company = $1 AND item_code = $2",
        )
        .bind(company.as_str())
        .bind(item.as_str())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_db)?;

        Ok(row.map(StockRow::into_balance).unwrap_or_default())
    }

    #[instrument(skip(self, balance), fields(company = %company, item = %item, current = balance.current))]
    async fn put_stock_balance(
        &mut self,
        company: &CompanyId,
        item: &ItemCode,
        balance: StockBalance,
    ) -> Result<(), PortError> {
        debug!("Writing stock balance");

        sqlx::query(
            "INSERT INTO stock_balances (company, item_code, opening, current) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (company, item_code) \
             DO UPDATE SET opening = EXCLUDED.opening, current = EXCLUDED.current",
        )
        .bind(company.as_str())
        .bind(item.as_str())
        .bind(balance.opening)
        .bind(balance.current)
        .execute(&mut *self.tx)
        .await
        .map_err(map_db)?;

        Ok(())
    }

    #[instrument(skip(self), fields(company = %company, item = %item, month = %month))]
    async fn load_sheet(
        &mut self,
        company: &CompanyId,
        item: &ItemCode,
        month: MonthKey,
    ) -> Result<Option<MonthSheet>, PortError> {
        let table = sheet_table(month, self.current_month);
        let sql = format!("SELECT cells FROM {table} WHERE company = $1 AND item_code = $2");

        let row = sqlx::query_scalar::<_, serde_json::Value>(&sql)
            .bind(company.as_str())
            .bind(item.as_str())
            .fetch_optional(&mut *self.tx)
            .await;

        // A month whose archive table was never provisioned has no
        // sheets; the engine decides whether that is an error.
        let cells = match row {
            Ok(value) => value,
            Err(ref err) if is_undefined_table(err) => return Ok(None),
            Err(err) => return Err(map_db(err)),
        };

        match cells {
            Some(value) => {
                let sheet = sheet_from_cells(company.clone(), item.clone(), month, value)
                    .map_err(db_to_port)?;
                Ok(Some(sheet))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self, sheet), fields(company = %sheet.company(), item = %sheet.item(), month = %sheet.month()))]
    async fn put_sheet(&mut self, sheet: &MonthSheet) -> Result<(), PortError> {
        debug!("Writing month sheet");

        let table = sheet_table(sheet.month(), self.current_month);
        let sql = format!(
            "INSERT INTO {table} (company, item_code, cells) VALUES ($1, $2, $3) \
             ON CONFLICT (company, item_code) DO UPDATE SET cells = EXCLUDED.cells"
        );

        let cells = cells_to_value(sheet).map_err(db_to_port)?;

        sqlx::query(&sql)
            .bind(sheet.company().as_str())
            .bind(sheet.item().as_str())
            .bind(cells)
            .execute(&mut *self.tx)
            .await
            .map_err(map_db)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn commit(self: Box<Self>) -> Result<(), PortError> {
        debug!("Committing unit of work");

        self.tx
            .commit()
            .await
            .map_err(|e| db_to_port(DatabaseError::TransactionFailed(e.to_string())))
    }

    #[instrument(skip(self))]
    async fn rollback(self: Box<Self>) -> Result<(), PortError> {
        debug!("Rolling back unit of work");

        self.tx
            .rollback()
            .await
            .map_err(|e| db_to_port(DatabaseError::TransactionFailed(e.to_string())))
    }
}

// ==== Error translation ====

/// Translates database errors to port errors
///
/// Lookups in this store return `Option` rather than raising `NotFound`,
/// so everything that is not a duplicate key or a connection failure
/// surfaces as an internal storage error.
fn db_to_port(err: DatabaseError) -> PortError {
    match err {
        DatabaseError::DuplicateEntry(msg) => PortError::conflict(msg),
        DatabaseError::ConnectionFailed(msg) => PortError::connection(msg),
        DatabaseError::PoolExhausted => PortError::connection("connection pool exhausted"),
        other => PortError::internal(other.to_string()),
    }
}

fn map_db(err: sqlx::Error) -> PortError {
    db_to_port(DatabaseError::from(&err))
}

fn is_undefined_table(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some("42P01"),
        _ => false,
    }
}

// ==== Row conversion ====

fn bill_no_from_suffix(suffix: i64) -> Result<BillNo, PortError> {
    u32::try_from(suffix)
        .map(BillNo::from_suffix)
        .map_err(|_| {
            db_to_port(DatabaseError::SerializationError(format!(
                "bill suffix {} is out of range",
                suffix
            )))
        })
}

fn mode_from_code(code: &str) -> Result<LiquorMode, DatabaseError> {
    match code {
        "F" => Ok(LiquorMode::Foreign),
        "C" => Ok(LiquorMode::Country),
        "O" => Ok(LiquorMode::Other),
        other => Err(DatabaseError::SerializationError(format!(
            "unknown liquor mode code {:?}",
            other
        ))),
    }
}

/// Rebuilds a bill from its stored parts, checking the header total
/// against the lines
fn verified_bill(header: BillHeader, lines: Vec<BillLine>) -> Result<Bill, PortError> {
    let bill = Bill { header, lines };
    bill.verify_totals().map_err(|e| {
        db_to_port(DatabaseError::SerializationError(format!(
            "stored bill {} fails verification: {}",
            bill.bill_no(),
            e
        )))
    })?;
    Ok(bill)
}

fn cells_to_value(sheet: &MonthSheet) -> Result<serde_json::Value, DatabaseError> {
    let cells: BTreeMap<u32, LedgerCell> = sheet
        .days()
        .map(|(day, cell)| (day.get(), *cell))
        .collect();
    serde_json::to_value(cells).map_err(|e| DatabaseError::SerializationError(e.to_string()))
}

fn sheet_from_cells(
    company: CompanyId,
    item: ItemCode,
    month: MonthKey,
    value: serde_json::Value,
) -> Result<MonthSheet, DatabaseError> {
    let cells: BTreeMap<u32, LedgerCell> = serde_json::from_value(value)
        .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;

    let mut sheet = MonthSheet::new(company, item, month);
    for (day, cell) in cells {
        let day = DayOfMonth::new(day)
            .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;
        sheet
            .insert_cell(day, cell)
            .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;
    }
    Ok(sheet)
}

/// Database row for a bill header
#[derive(Debug, FromRow)]
struct BillHeaderRow {
    bill_suffix: i64,
    bill_date: chrono::NaiveDate,
    company: String,
    mode: String,
    total_amount: rust_decimal::Decimal,
    discount: rust_decimal::Decimal,
    net_amount: rust_decimal::Decimal,
}

impl BillHeaderRow {
    fn into_header(self) -> Result<BillHeader, DatabaseError> {
        let suffix = u32::try_from(self.bill_suffix).map_err(|_| {
            DatabaseError::SerializationError(format!(
                "bill suffix {} is out of range",
                self.bill_suffix
            ))
        })?;
        let company = CompanyId::new(self.company)
            .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;

        Ok(BillHeader {
            bill_no: BillNo::from_suffix(suffix),
            date: self.bill_date,
            company,
            mode: mode_from_code(&self.mode)?,
            total_amount: self.total_amount,
            discount: self.discount,
            net_amount: self.net_amount,
        })
    }
}

/// Database row for a bill line
#[derive(Debug, FromRow)]
struct BillLineRow {
    item_code: String,
    qty: i64,
    rate: rust_decimal::Decimal,
    amount: rust_decimal::Decimal,
}

impl BillLineRow {
    fn into_line(self) -> Result<BillLine, DatabaseError> {
        let item = ItemCode::new(self.item_code)
            .map_err(|e| DatabaseError::SerializationError(e.to_string()))?;
        let qty = u32::try_from(self.qty).map_err(|_| {
            DatabaseError::SerializationError(format!("line quantity {} is out of range", self.qty))
        })?;

        Ok(BillLine {
            item,
            qty,
            rate: self.rate,
            amount: self.amount,
        })
    }
}

/// Database row for a cumulative stock balance
#[derive(Debug, FromRow)]
struct StockRow {
    opening: i64,
    current: i64,
}

impl StockRow {
    fn into_balance(self) -> StockBalance {
        StockBalance {
            opening: self.opening,
            current: self.current,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn company() -> CompanyId {
        CompanyId::new("UP-4021").unwrap()
    }

    fn item() -> ItemCode {
        ItemCode::new("FL0750").unwrap()
    }

    fn sale_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 15).unwrap()
    }

    fn sample_bill() -> Bill {
        Bill::new(
            BillNo::from_suffix(7),
            sale_date(),
            company(),
            LiquorMode::Foreign,
            vec![BillLine::new(item(), 2, dec!(540))],
        )
        .unwrap()
    }

    mod mode_codec_tests {
        use super::*;

        #[test]
        fn test_mode_codes_round_trip() {
            for mode in [LiquorMode::Foreign, LiquorMode::Country, LiquorMode::Other] {
                assert_eq!(mode_from_code(mode.code()).unwrap(), mode);
            }
        }

        #[test]
        fn test_unknown_mode_code_is_rejected() {
            let err = mode_from_code("X").unwrap_err();
            assert!(matches!(err, DatabaseError::SerializationError(_)));
        }
    }

    mod cell_codec_tests {
        use super::*;

        #[test]
        fn test_sheet_cells_round_trip() {
            let mut sheet = MonthSheet::new(company(), item(), MonthKey::new(2024, 7).unwrap());
            sheet.seed_month(20);
            sheet
                .post_sale(DayOfMonth::new(10).unwrap(), 3, false)
                .unwrap();

            let value = cells_to_value(&sheet).unwrap();
            let restored =
                sheet_from_cells(company(), item(), MonthKey::new(2024, 7).unwrap(), value)
                    .unwrap();

            assert_eq!(restored, sheet);
        }

        #[test]
        fn test_sparse_sheet_round_trip_keeps_gaps() {
            let mut sheet = MonthSheet::new(company(), item(), MonthKey::new(2024, 7).unwrap());
            sheet
                .insert_cell(DayOfMonth::new(1).unwrap(), LedgerCell::new(10))
                .unwrap();
            sheet
                .insert_cell(DayOfMonth::new(3).unwrap(), LedgerCell::new(10))
                .unwrap();

            let value = cells_to_value(&sheet).unwrap();
            let restored =
                sheet_from_cells(company(), item(), MonthKey::new(2024, 7).unwrap(), value)
                    .unwrap();

            assert_eq!(restored.len(), 2);
            assert!(restored.cell(DayOfMonth::new(2).unwrap()).is_none());
        }

        #[test]
        fn test_out_of_range_day_key_is_rejected() {
            let value = serde_json::json!({
                "32": { "opening": 1, "purchase": 0, "sales": 0, "adjustment": 0, "closing": 1 }
            });

            let err =
                sheet_from_cells(company(), item(), MonthKey::new(2024, 7).unwrap(), value)
                    .unwrap_err();
            assert!(matches!(err, DatabaseError::SerializationError(_)));
        }
    }

    mod row_conversion_tests {
        use super::*;

        #[test]
        fn test_header_row_rebuilds_header() {
            let row = BillHeaderRow {
                bill_suffix: 7,
                bill_date: sale_date(),
                company: "UP-4021".to_string(),
                mode: "F".to_string(),
                total_amount: dec!(1080),
                discount: Decimal::ZERO,
                net_amount: dec!(1080),
            };

            let header = row.into_header().unwrap();
            assert_eq!(header.bill_no, BillNo::from_suffix(7));
            assert_eq!(header.company, company());
            assert_eq!(header.mode, LiquorMode::Foreign);
        }

        #[test]
        fn test_header_row_rejects_bad_mode() {
            let row = BillHeaderRow {
                bill_suffix: 7,
                bill_date: sale_date(),
                company: "UP-4021".to_string(),
                mode: "Z".to_string(),
                total_amount: dec!(1080),
                discount: Decimal::ZERO,
                net_amount: dec!(1080),
            };

            assert!(row.into_header().is_err());
        }

        #[test]
        fn test_header_row_rejects_negative_suffix() {
            let row = BillHeaderRow {
                bill_suffix: -1,
                bill_date: sale_date(),
                company: "UP-4021".to_string(),
                mode: "F".to_string(),
                total_amount: dec!(1080),
                discount: Decimal::ZERO,
                net_amount: dec!(1080),
            };

            assert!(row.into_header().is_err());
        }

        #[test]
        fn test_line_row_rejects_negative_quantity() {
            let row = BillLineRow {
                item_code: "FL0750".to_string(),
                qty: -1,
                rate: dec!(540),
                amount: dec!(540),
            };

            assert!(row.into_line().is_err());
        }

        #[test]
        fn test_verified_bill_catches_total_mismatch() {
            let bill = sample_bill();
            let mut header = bill.header.clone();
            header.total_amount = dec!(1);

            let err = verified_bill(header, bill.lines.clone()).unwrap_err();
            assert!(err.to_string().contains("verification"));
        }

        #[test]
        fn test_staged_payload_round_trips() {
            let bill = sample_bill();
            let payload = serde_json::to_value(&bill).unwrap();
            let restored: Bill = serde_json::from_value(payload).unwrap();
            assert_eq!(restored, bill);
        }
    }

    mod cell_codec_proptests {
        use super::*;
        use proptest::prelude::*;

        fn cell_strategy() -> impl Strategy<Value = LedgerCell> {
            (-500i64..500, 0i64..500, 0i64..500, -50i64..50).prop_map(
                |(opening, purchase, sales, adjustment)| {
                    LedgerCell::from_parts(
                        opening,
                        purchase,
                        sales,
                        adjustment,
                        opening + purchase - sales + adjustment,
                    )
                },
            )
        }

        proptest! {
            #[test]
            fn any_sheet_survives_the_cells_codec(
                cells in proptest::collection::btree_map(1u32..29, cell_strategy(), 0..15)
            ) {
                let month = MonthKey::new(2024, 7).unwrap();
                let mut sheet = MonthSheet::new(company(), item(), month);
                for (day, cell) in &cells {
                    sheet.insert_cell(DayOfMonth::new(*day).unwrap(), *cell).unwrap();
                }

                let value = cells_to_value(&sheet).unwrap();
                let restored = sheet_from_cells(company(), item(), month, value).unwrap();

                prop_assert_eq!(restored, sheet);
            }
        }
    }

    mod error_translation_tests {
        use super::*;

        #[test]
        fn test_duplicate_entry_becomes_conflict() {
            let err = db_to_port(DatabaseError::DuplicateEntry("bill taken".into()));
            assert!(err.is_conflict());
        }

        #[test]
        fn test_connection_failures_stay_transient() {
            let refused = db_to_port(DatabaseError::ConnectionFailed("refused".into()));
            assert!(refused.is_transient());

            let exhausted = db_to_port(DatabaseError::PoolExhausted);
            assert!(exhausted.is_transient());
        }

        #[test]
        fn test_query_failures_become_internal() {
            let err = db_to_port(DatabaseError::QueryFailed("syntax".into()));
            assert!(matches!(err, PortError::Internal { .. }));
        }

        #[test]
        fn test_suffix_conversion_guards_range() {
            assert_eq!(bill_no_from_suffix(42).unwrap(), BillNo::from_suffix(42));
            assert!(bill_no_from_suffix(-5).is_err());
            assert!(bill_no_from_suffix(i64::MAX).is_err());
        }
    }
}
