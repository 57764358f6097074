//! EoX API response decoding.

use chrono::NaiveDate;
use serde::Deserialize;

use super::CiscoApiError;
use crate::model::LifecycleUpdate;

/// One page of an `EOXByProductID` response.
#[derive(Debug, Deserialize)]
pub struct EoxPage {
    #[serde(rename = "PaginationResponseRecord")]
    pub pagination: Option<Pagination>,
    #[serde(rename = "EOXRecord", default)]
    pub records: Vec<EoxRecord>,
    /// Request level error, returned instead of records for bad queries.
    #[serde(rename = "EOXError")]
    pub error: Option<EoxError>,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(rename = "PageIndex")]
    pub page_index: u32,
    #[serde(rename = "LastIndex")]
    pub last_index: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EoxError {
    #[serde(rename = "ErrorID", default)]
    pub error_id: String,
    #[serde(rename = "ErrorDescription", default)]
    pub error_description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EoxDate {
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EoxRecord {
    #[serde(rename = "EOLProductID", default)]
    pub eol_product_id: String,
    #[serde(rename = "ProductIDDescription", default)]
    pub product_id_description: String,
    #[serde(rename = "ProductBulletinNumber", default)]
    pub product_bulletin_number: String,
    #[serde(rename = "LinkToProductBulletinURL", default)]
    pub link_to_product_bulletin_url: String,
    #[serde(rename = "EOXExternalAnnouncementDate", default)]
    pub external_announcement_date: EoxDate,
    #[serde(rename = "EndOfSaleDate", default)]
    pub end_of_sale_date: EoxDate,
    #[serde(rename = "LastDateOfSupport", default)]
    pub last_date_of_support: EoxDate,
    /// Set when the API has no EoX data for the requested id.
    #[serde(rename = "EOXError")]
    pub error: Option<EoxError>,
}

impl EoxPage {
    pub fn parse(body: &str) -> Result<Self, CiscoApiError> {
        serde_json::from_str(body)
            .map_err(|e| CiscoApiError::ApiCallFailed(format!("unexpected EoX response: {e}")))
    }

    /// Whether another page follows this one.
    pub fn has_more(&self) -> bool {
        self.pagination
            .as_ref()
            .is_some_and(|p| p.page_index < p.last_index)
    }
}

impl EoxRecord {
    /// Lifecycle data carried by this record, or `None` for error records.
    pub fn to_lifecycle_update(&self) -> Option<LifecycleUpdate> {
        if self.error.is_some() || self.eol_product_id.trim().is_empty() {
            return None;
        }
        Some(LifecycleUpdate {
            product_id: self.eol_product_id.trim().to_string(),
            description: non_empty(&self.product_id_description),
            eol_ext_announcement_date: parse_date(&self.external_announcement_date),
            end_of_sale_date: parse_date(&self.end_of_sale_date),
            end_of_support_date: parse_date(&self.last_date_of_support),
            eol_reference_number: non_empty(&self.product_bulletin_number),
            eol_reference_url: non_empty(&self.link_to_product_bulletin_url),
        })
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn parse_date(d: &EoxDate) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(d.value.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"{
        "PaginationResponseRecord": {"PageIndex": 1, "LastIndex": 2, "TotalRecords": 2},
        "EOXRecord": [
            {
                "EOLProductID": "WS-C2960X-24TS-L",
                "ProductIDDescription": "Catalyst 2960-X 24 GigE, 4 x 1G SFP, LAN Base",
                "ProductBulletinNumber": "EOL10616",
                "LinkToProductBulletinURL": "http://www.cisco.com/c/en/us/products/eol.html",
                "EOXExternalAnnouncementDate": {"value": "2016-01-05", "dateFormat": "YYYY-MM-DD"},
                "EndOfSaleDate": {"value": "2017-02-28", "dateFormat": "YYYY-MM-DD"},
                "LastDateOfSupport": {"value": "", "dateFormat": "YYYY-MM-DD"}
            },
            {
                "EOLProductID": "",
                "EOXError": {
                    "ErrorID": "SSA_ERR_026",
                    "ErrorDescription": "EOX information does not exist for the following product ID(s): FOO"
                }
            }
        ]
    }"#;

    #[test]
    fn decodes_records_and_dates() {
        let page = EoxPage::parse(PAGE).unwrap();
        assert!(page.has_more());
        assert_eq!(page.records.len(), 2);

        let update = page.records[0].to_lifecycle_update().unwrap();
        assert_eq!(update.product_id, "WS-C2960X-24TS-L");
        assert_eq!(update.eol_ext_announcement_date, NaiveDate::from_ymd_opt(2016, 1, 5));
        assert_eq!(update.end_of_sale_date, NaiveDate::from_ymd_opt(2017, 2, 28));
        assert_eq!(update.end_of_support_date, None);
        assert_eq!(update.eol_reference_number.as_deref(), Some("EOL10616"));
    }

    #[test]
    fn error_records_carry_no_update() {
        let page = EoxPage::parse(PAGE).unwrap();
        assert!(page.records[1].to_lifecycle_update().is_none());
        assert_eq!(
            page.records[1].error.as_ref().map(|e| e.error_id.as_str()),
            Some("SSA_ERR_026")
        );
    }

    #[test]
    fn garbage_is_an_api_failure() {
        assert!(matches!(
            EoxPage::parse("<html>"),
            Err(CiscoApiError::ApiCallFailed(_))
        ));
    }
}
