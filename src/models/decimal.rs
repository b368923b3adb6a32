use std::str::FromStr;

use diesel::backend::Backend;
use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use diesel::sqlite::Sqlite;
use rust_decimal::Decimal;

/// Decimal places of the `DECIMAL(p, 2)` columns.
pub const DECIMAL_SCALE: u32 = 2;

/// Precision and scale of a `DECIMAL(p, s)` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalColumn {
    pub name: &'static str,
    pub precision: u32,
    pub scale: u32,
}

/// `products.list_price` and `order_items.list_price`.
pub const LIST_PRICE: DecimalColumn = DecimalColumn {
    name: "list_price",
    precision: 10,
    scale: DECIMAL_SCALE,
};

/// `order_items.discount`.
pub const DISCOUNT: DecimalColumn = DecimalColumn {
    name: "discount",
    precision: 4,
    scale: DECIMAL_SCALE,
};

impl DecimalColumn {
    /// Largest magnitude the column holds, `99999999.99` for `DECIMAL(10, 2)`.
    pub fn max_value(&self) -> Decimal {
        Decimal::new(10_i64.pow(self.precision) - 1, self.scale)
    }

    /// Accept `value` only if the column stores it unchanged.
    pub fn check(&self, value: Decimal) -> Result<Decimal, String> {
        if value.normalize().scale() > self.scale {
            return Err(format!(
                "{} {value} has more than {} decimal places",
                self.name, self.scale
            ));
        }
        if value.abs() > self.max_value() {
            return Err(format!(
                "{} {value} does not fit DECIMAL({}, {})",
                self.name, self.precision, self.scale
            ));
        }
        Ok(value)
    }
}

/// Column value of a `DECIMAL` column.
///
/// SQLite has no decimal storage class: values are bound as text and stored
/// with NUMERIC affinity. Reading goes through the textual form and rescales
/// to [`DECIMAL_SCALE`], so `5` comes back as `5.00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, AsExpression, FromSqlRow)]
#[diesel(sql_type = Text)]
pub struct SqlDecimal(pub Decimal);

impl From<Decimal> for SqlDecimal {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<SqlDecimal> for Decimal {
    fn from(value: SqlDecimal) -> Self {
        value.0
    }
}

impl ToSql<Text, Sqlite> for SqlDecimal {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Sqlite>) -> serialize::Result {
        out.set_value(self.0.normalize().to_string());
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Sqlite> for SqlDecimal {
    fn from_sql(bytes: <Sqlite as Backend>::RawValue<'_>) -> deserialize::Result<Self> {
        let text = <String as FromSql<Text, Sqlite>>::from_sql(bytes)?;
        Ok(Self(parse_stored_decimal(&text)?))
    }
}

/// Parse the text SQLite hands back for a NUMERIC value.
pub fn parse_stored_decimal(text: &str) -> Result<Decimal, rust_decimal::Error> {
    let trimmed = text.trim();
    let mut value = Decimal::from_str(trimmed).or_else(|_| Decimal::from_scientific(trimmed))?;
    value.rescale(DECIMAL_SCALE);
    Ok(value)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parses_integer_and_real_renderings() {
        assert_eq!(parse_stored_decimal("5").unwrap().to_string(), "5.00");
        assert_eq!(parse_stored_decimal("379.99").unwrap(), dec!(379.99));
        assert_eq!(parse_stored_decimal("0.0").unwrap().to_string(), "0.00");
        assert_eq!(parse_stored_decimal("1.5e2").unwrap(), dec!(150.00));
    }

    #[test]
    fn column_check_rejects_values_that_would_change() {
        assert_eq!(LIST_PRICE.max_value(), dec!(99999999.99));
        assert_eq!(DISCOUNT.max_value(), dec!(99.99));

        assert_eq!(LIST_PRICE.check(dec!(379.990)).unwrap(), dec!(379.99));
        assert!(LIST_PRICE.check(dec!(99999999.99)).is_ok());
        assert!(LIST_PRICE.check(dec!(19.999)).is_err());
        assert!(LIST_PRICE.check(dec!(100000000)).is_err());
        assert!(LIST_PRICE.check(dec!(1234567890123456789.12)).is_err());

        assert!(DISCOUNT.check(dec!(0.07)).is_ok());
        assert!(DISCOUNT.check(dec!(0.075)).is_err());
        assert!(DISCOUNT.check(dec!(100)).is_err());
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_stored_decimal("twelve").is_err());
    }
}
