//! # Product Catalog
//!
//! The fixed set of products for a session, built once at startup from
//! `name:description:price:unit` records.
//!
//! ## Record Checks (in order)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  "bananer:Gula och goda:20:kg"                                          │
//! │       │                                                                 │
//! │       ├── name empty?            → Required        (skip line)          │
//! │       ├── name already loaded?   → Duplicate       (skip line)          │
//! │       ├── field count != 4?      → FieldCount      (skip line)          │
//! │       ├── price not an integer?  → InvalidFormat   (skip line)          │
//! │       ├── price <= 0?            → MustBePositive  (skip line)          │
//! │       └── OK → appended in file order                                   │
//! │                                                                         │
//! │  Source without a single non-blank line → EmptyCatalog (fatal)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::load::{non_blank_lines, LoadReport, RejectedLine};
use crate::types::Product;
use crate::validation::{parse_integer, ValidationResult};
use crate::FIELD_SEPARATOR;

/// Number of `:`-separated fields in a catalog record.
const CATALOG_FIELDS: usize = 4;

/// Products available in this session, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Builds a catalog from already-validated products.
    ///
    /// Fails with `Duplicate` when two products share a name.
    pub fn from_products(products: Vec<Product>) -> ValidationResult<Self> {
        let mut catalog = Catalog::default();
        for product in products {
            catalog.ensure_unique(product.name())?;
            catalog.products.push(product);
        }
        Ok(catalog)
    }

    /// Parses catalog text, skipping bad records.
    ///
    /// ## Example
    /// ```rust
    /// use kassa_core::Catalog;
    ///
    /// let report = Catalog::parse("mjölk:Färsk:13:l\nbroken line\n").unwrap();
    /// assert_eq!(report.value.len(), 1);
    /// assert_eq!(report.rejected.len(), 1);
    /// assert!(Catalog::parse("").is_err());
    /// ```
    pub fn parse(text: &str) -> CoreResult<LoadReport<Catalog>> {
        let mut lines = non_blank_lines(text).peekable();
        if lines.peek().is_none() {
            return Err(CoreError::EmptyCatalog);
        }

        let mut catalog = Catalog::default();
        let mut rejected = Vec::new();

        for (line_number, line) in lines {
            match catalog.parse_record(line) {
                Ok(product) => catalog.products.push(product),
                Err(error) => rejected.push(RejectedLine {
                    line_number,
                    content: line.to_string(),
                    error,
                }),
            }
        }

        Ok(LoadReport {
            value: catalog,
            rejected,
        })
    }

    fn parse_record(&self, line: &str) -> ValidationResult<Product> {
        let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();

        let name = fields[0].trim();
        if name.is_empty() {
            return Err(ValidationError::Required {
                field: "name".to_string(),
            });
        }

        self.ensure_unique(name)?;

        if fields.len() != CATALOG_FIELDS {
            return Err(ValidationError::FieldCount {
                expected: CATALOG_FIELDS,
                found: fields.len(),
            });
        }

        let price = parse_integer("price", fields[2])?;

        Product::try_from((name, fields[1], price, fields[3]))
    }

    fn ensure_unique(&self, name: &str) -> ValidationResult<()> {
        if self.contains(name) {
            return Err(ValidationError::Duplicate {
                field: "product name".to_string(),
                value: name.to_string(),
            });
        }
        Ok(())
    }

    /// Looks up a product by exact name.
    pub fn find_by_name(&self, name: &str) -> CoreResult<&Product> {
        self.get(name)
            .ok_or_else(|| CoreError::ProductNotFound(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Product names in listing order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.products.iter().map(Product::name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.products.iter()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.products.iter()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PriceUnit;

    const SAMPLE: &str = "\
bananer:Gula och goda:20:kg
mjölk:Färsk mellanmjölk:13:l
kycklingklubba::35:st
";

    #[test]
    fn test_parse_valid_catalog() {
        let report = Catalog::parse(SAMPLE).unwrap();
        assert!(report.is_clean());

        let catalog = report.value;
        assert_eq!(catalog.len(), 3);
        assert_eq!(
            catalog.names().collect::<Vec<_>>(),
            vec!["bananer", "mjölk", "kycklingklubba"]
        );

        let bananer = catalog.find_by_name("bananer").unwrap();
        assert_eq!(bananer.price().kronor(), 20);
        assert_eq!(bananer.unit(), PriceUnit::Kilogram);
        assert_eq!(bananer.description(), "Gula och goda");
    }

    #[test]
    fn test_missing_description_gets_placeholder() {
        let catalog = Catalog::parse(SAMPLE).unwrap().value;
        let klubba = catalog.find_by_name("kycklingklubba").unwrap();
        assert_eq!(klubba.description(), crate::MISSING_DESCRIPTION);
    }

    #[test]
    fn test_unknown_unit_defaults_to_st() {
        let catalog = Catalog::parse("bensin:95 oktan:19:gallon").unwrap().value;
        assert_eq!(
            catalog.find_by_name("bensin").unwrap().unit(),
            PriceUnit::Unit
        );
    }

    #[test]
    fn test_empty_source_is_fatal() {
        assert!(matches!(Catalog::parse(""), Err(CoreError::EmptyCatalog)));
        assert!(matches!(
            Catalog::parse("\n   \n"),
            Err(CoreError::EmptyCatalog)
        ));
    }

    #[test]
    fn test_bad_lines_are_skipped_and_reported() {
        let text = "\
bananer:Gula:20:kg
:ingen namn:10:st
bananer:igen:25:kg
mjölk:för få fält:13
ost:Lagrad:dyr:kg
gratis:Noll kronor:0:st
bröd:Surdeg:30:st
";
        let report = Catalog::parse(text).unwrap();
        let catalog = &report.value;

        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["bananer", "bröd"]);

        let reasons: Vec<_> = report
            .rejected
            .iter()
            .map(|r| (r.line_number, r.error.clone()))
            .collect();
        assert_eq!(reasons.len(), 5);
        assert!(matches!(reasons[0], (2, ValidationError::Required { .. })));
        assert!(matches!(reasons[1], (3, ValidationError::Duplicate { .. })));
        assert!(matches!(
            reasons[2],
            (4, ValidationError::FieldCount { expected: 4, found: 3 })
        ));
        assert!(matches!(reasons[3], (5, ValidationError::InvalidFormat { .. })));
        assert!(matches!(reasons[4], (6, ValidationError::MustBePositive { .. })));
    }

    #[test]
    fn test_only_bad_lines_gives_empty_catalog_not_error() {
        let report = Catalog::parse("nonsense").unwrap();
        assert!(report.value.is_empty());
        assert_eq!(report.rejected.len(), 1);
    }

    #[test]
    fn test_find_unknown_product() {
        let catalog = Catalog::parse(SAMPLE).unwrap().value;
        let err = catalog.find_by_name("äpplen").unwrap_err();
        assert!(matches!(err, CoreError::ProductNotFound(ref n) if n == "äpplen"));
    }

    #[test]
    fn test_from_products_rejects_duplicates() {
        let a = Product::try_from(("ost", "Lagrad", 90, "kg")).unwrap();
        let b = Product::try_from(("ost", "Färsk", 60, "kg")).unwrap();
        assert!(Catalog::from_products(vec![a.clone()]).is_ok());
        assert!(matches!(
            Catalog::from_products(vec![a, b]),
            Err(ValidationError::Duplicate { .. })
        ));
    }
}
