//! Smart-code classification for the jewelry pack.
//!
//! Codes are decoded once, at the boundary, into enumerated variants by
//! exact segment comparison. A code that merely *contains* a known fragment
//! (`...LINE.ITEM.OLD.v1`) does not match anything and is rejected
//! deterministically.

use crate::smartcode::SmartCode;

/// Number of segments in a fully qualified jewelry code:
/// `<prefix>.<domain>.<module>.<function>.<type>.v<N>`.
const CODE_SEGMENTS: usize = 6;

/// Transaction variants handled by the jewelry pack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JewelryTxnKind {
    /// Retail sale at the point of sale (`POS.SALE.TXN`).
    PosSale,
    /// Old-metal exchange intake (`EXCHANGE.INTAKE.TXN`).
    ExchangeIntake,
    /// Job-work material issue (`JOBWORK.ISSUE.TXN`).
    JobworkIssue,
    /// Job-work finished-goods receipt (`JOBWORK.RECEIPT.TXN`).
    JobworkReceipt,
    /// Melt/scrap reconciliation (`MELT.RECON.TXN`).
    MeltRecon,
}

impl JewelryTxnKind {
    /// Decodes a header code by exact segment match.
    ///
    /// Returns `None` for any code that is not one of the enumerated
    /// variants, including codes with extra trailing segments.
    #[must_use]
    pub fn from_code(code: &SmartCode) -> Option<Self> {
        if code.segments().len() != CODE_SEGMENTS || code.version().is_none() {
            return None;
        }
        match (code.segment(2)?, code.segment(3)?, code.segment(4)?) {
            ("POS", "SALE", "TXN") => Some(Self::PosSale),
            ("EXCHANGE", "INTAKE", "TXN") => Some(Self::ExchangeIntake),
            ("JOBWORK", "ISSUE", "TXN") => Some(Self::JobworkIssue),
            ("JOBWORK", "RECEIPT", "TXN") => Some(Self::JobworkReceipt),
            ("MELT", "RECON", "TXN") => Some(Self::MeltRecon),
            _ => None,
        }
    }
}

/// Line variants handled by the jewelry pack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JewelryLineKind {
    /// Retail item carrying metal inputs (`LINE.ITEM`).
    Item,
    /// Making / labor charge (`LINE.MAKING`).
    Making,
    /// Gemstone value (`LINE.STONE`).
    Stone,
    /// Tax (`LINE.TAX`).
    Tax,
    /// Old-metal exchange (`LINE.EXCHANGE`).
    Exchange,
    /// Rounding adjustment (`LINE.ADJUSTMENT`).
    Adjustment,
}

impl JewelryLineKind {
    /// Decodes a line code by exact segment match.
    #[must_use]
    pub fn from_code(code: &SmartCode) -> Option<Self> {
        if code.segments().len() != CODE_SEGMENTS || code.version().is_none() {
            return None;
        }
        if code.segment(3)? != "LINE" {
            return None;
        }
        match code.segment(4)? {
            "ITEM" => Some(Self::Item),
            "MAKING" => Some(Self::Making),
            "STONE" => Some(Self::Stone),
            "TAX" => Some(Self::Tax),
            "EXCHANGE" => Some(Self::Exchange),
            "ADJUSTMENT" => Some(Self::Adjustment),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn code(raw: &str) -> SmartCode {
        SmartCode::parse(raw).unwrap()
    }

    #[rstest]
    #[case("TESSERA.JEWELRY.POS.SALE.TXN.v1", Some(JewelryTxnKind::PosSale))]
    #[case("TESSERA.JEWELRY.EXCHANGE.INTAKE.TXN.v1", Some(JewelryTxnKind::ExchangeIntake))]
    #[case("TESSERA.JEWELRY.JOBWORK.ISSUE.TXN.v1", Some(JewelryTxnKind::JobworkIssue))]
    #[case("TESSERA.JEWELRY.JOBWORK.RECEIPT.TXN.v2", Some(JewelryTxnKind::JobworkReceipt))]
    #[case("TESSERA.JEWELRY.MELT.RECON.TXN.v1", Some(JewelryTxnKind::MeltRecon))]
    #[case("TESSERA.JEWELRY.CRM.CAMPAIGN.TXN.v1", None)]
    #[case("TESSERA.JEWELRY.POS.SALE.TXN.EXTRA.v1", None)]
    #[case("TESSERA.JEWELRY.POS.SALE.TXN.nov", None)]
    fn test_txn_classification(#[case] raw: &str, #[case] expected: Option<JewelryTxnKind>) {
        assert_eq!(JewelryTxnKind::from_code(&code(raw)), expected);
    }

    #[rstest]
    #[case("TESSERA.JEWELRY.POS.LINE.ITEM.v1", Some(JewelryLineKind::Item))]
    #[case("TESSERA.JEWELRY.POS.LINE.MAKING.v1", Some(JewelryLineKind::Making))]
    #[case("TESSERA.JEWELRY.POS.LINE.STONE.v1", Some(JewelryLineKind::Stone))]
    #[case("TESSERA.JEWELRY.POS.LINE.TAX.v1", Some(JewelryLineKind::Tax))]
    #[case("TESSERA.JEWELRY.EXCHANGE.LINE.EXCHANGE.v1", Some(JewelryLineKind::Exchange))]
    #[case("TESSERA.JEWELRY.POS.LINE.ADJUSTMENT.v1", Some(JewelryLineKind::Adjustment))]
    #[case("TESSERA.JEWELRY.POS.LINE.FREIGHT.v1", None)]
    #[case("TESSERA.JEWELRY.POS.ITEM.RETAIL.v1", None)]
    fn test_line_classification(#[case] raw: &str, #[case] expected: Option<JewelryLineKind>) {
        assert_eq!(JewelryLineKind::from_code(&code(raw)), expected);
    }

    /// A code that merely contains a known fragment must not match.
    /// (A containment check would classify this as an item line.)
    #[test]
    fn test_lookalike_codes_rejected() {
        let lookalike = code("TESSERA.JEWELRY.POS.LINE.ITEM.OLD.v1");
        assert_eq!(JewelryLineKind::from_code(&lookalike), None);

        let lookalike = code("TESSERA.JEWELRY.POS.SALE.TXN.DRAFT.v1");
        assert_eq!(JewelryTxnKind::from_code(&lookalike), None);
    }
}
