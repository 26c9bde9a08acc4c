//! Payment checkout form
//!
//! Field formatting and validation are free functions; [`PaymentScreen`]
//! holds what the user typed and runs them in order card, expiration, CVV.

use super::plans::{plan_by_identifier, SubscriptionPlan};
use super::validation::digits_only;
use crate::errors::{ExpirationError, PaymentError};
use chrono::{Datelike, Local, NaiveDate};

pub const MIN_CARD_DIGITS: usize = 13;
pub const MAX_CVV_LEN: usize = 4;

/// Group the digits of `input` in blocks of four
pub fn format_card_number(input: &str) -> String {
    let digits: Vec<char> = digits_only(input).chars().collect();
    digits
        .chunks(4)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// `MMYY` as `MM/YY` once two digits are present; digits past the fourth are not shown
pub fn format_expiration(input: &str) -> String {
    let digits = digits_only(input);
    if digits.len() < 2 {
        return digits;
    }
    let year: String = digits.chars().skip(2).take(2).collect();
    format!("{}/{}", &digits[..2], year)
}

pub fn validate_card_number(input: &str) -> bool {
    digits_only(input).len() >= MIN_CARD_DIGITS
}

/// Check an expiration against the month containing `today`
pub fn validate_expiration(input: &str, today: NaiveDate) -> Result<(), ExpirationError> {
    let digits = digits_only(input);
    if digits.len() != 4 {
        return Err(ExpirationError::Malformed);
    }
    let month: u32 = digits[..2].parse().map_err(|_| ExpirationError::Malformed)?;
    let year: i32 = digits[2..].parse().map_err(|_| ExpirationError::Malformed)?;

    if !(1..=12).contains(&month) {
        return Err(ExpirationError::MonthOutOfRange);
    }
    let current = (today.year() % 100, today.month());
    if (year, month) < current {
        return Err(ExpirationError::Expired);
    }
    Ok(())
}

pub fn validate_cvv(input: &str) -> bool {
    (3..=MAX_CVV_LEN).contains(&input.len()) && input.chars().all(|c| c.is_ascii_digit())
}

/// Contract recorded after a successful payment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contract {
    pub plan_identifier: u8,
    pub card_last_four: String,
    pub signed_on: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentScreen {
    card_identifier: u8,
    card_number: String,
    /// Expiration exactly as typed; only the display is formatted
    expiration_input: String,
    expiration: String,
    cvv: String,
    is_processing: bool,
    processing_transitions: Vec<bool>,
    payment_success: bool,
    error: Option<PaymentError>,
    contract: Option<Contract>,
}

impl PaymentScreen {
    /// Checkout for the plan with `card_identifier`
    pub fn new(card_identifier: u8) -> Self {
        Self {
            card_identifier,
            card_number: String::new(),
            expiration_input: String::new(),
            expiration: String::new(),
            cvv: String::new(),
            is_processing: false,
            processing_transitions: Vec::new(),
            payment_success: false,
            error: None,
            contract: None,
        }
    }

    pub fn card_identifier(&self) -> u8 {
        self.card_identifier
    }

    pub fn plan(&self) -> Option<&'static SubscriptionPlan> {
        plan_by_identifier(self.card_identifier)
    }

    /// Store the card number the way the input field displays it
    pub fn set_card_number(&mut self, input: &str) {
        self.card_number = format_card_number(input);
    }

    pub fn set_expiration(&mut self, input: &str) {
        self.expiration_input = input.to_string();
        self.expiration = format_expiration(input);
    }

    /// The CVV field accepts at most four characters
    pub fn set_cvv(&mut self, input: &str) {
        self.cvv = input.chars().take(MAX_CVV_LEN).collect();
    }

    pub fn card_number(&self) -> &str {
        &self.card_number
    }

    pub fn expiration(&self) -> &str {
        &self.expiration
    }

    /// CVV as displayed: one bullet per character
    pub fn masked_cvv(&self) -> String {
        "•".repeat(self.cvv.chars().count())
    }

    pub fn is_processing(&self) -> bool {
        self.is_processing
    }

    pub fn processing_was_shown(&self) -> bool {
        self.processing_transitions.contains(&true)
    }

    /// Fields are read-only while a payment is in flight
    pub fn fields_editable(&self) -> bool {
        !self.is_processing
    }

    pub fn payment_success(&self) -> bool {
        self.payment_success
    }

    pub fn error(&self) -> Option<&PaymentError> {
        self.error.as_ref()
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|e| match e {
            PaymentError::InvalidExpiration(reason) => format!("{} ({})", e, reason),
            other => other.to_string(),
        })
    }

    pub fn contract(&self) -> Option<&Contract> {
        self.contract.as_ref()
    }

    /// Validate against today's date and record the payment
    pub fn process_payment(&mut self) -> Result<(), PaymentError> {
        self.process_payment_at(Local::now().date_naive())
    }

    pub fn process_payment_at(&mut self, today: NaiveDate) -> Result<(), PaymentError> {
        if let Err(e) = self.check_fields(today) {
            tracing::debug!("Payment rejected: {}", e);
            self.error = Some(e.clone());
            return Err(e);
        }

        self.set_processing(true);
        let digits = digits_only(&self.card_number);
        let last_four = digits[digits.len().saturating_sub(4)..].to_string();
        self.contract = Some(Contract {
            plan_identifier: self.card_identifier,
            card_last_four: last_four,
            signed_on: today,
        });
        self.payment_success = true;
        self.error = None;
        self.set_processing(false);
        Ok(())
    }

    fn check_fields(&self, today: NaiveDate) -> Result<(), PaymentError> {
        if !validate_card_number(&self.card_number) {
            return Err(PaymentError::InvalidCardNumber);
        }
        validate_expiration(&self.expiration_input, today)
            .map_err(PaymentError::InvalidExpiration)?;
        if !validate_cvv(&self.cvv) {
            return Err(PaymentError::InvalidCvv);
        }
        Ok(())
    }

    fn set_processing(&mut self, processing: bool) {
        self.is_processing = processing;
        self.processing_transitions.push(processing);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_card_formatting() {
        assert_eq!(format_card_number("4532015112830366"), "4532 0151 1283 0366");
        assert_eq!(format_card_number("4532-0151 1283"), "4532 0151 1283");
        assert_eq!(format_card_number(""), "");
    }

    #[test]
    fn test_expiration_formatting() {
        assert_eq!(format_expiration("1225"), "12/25");
        assert_eq!(format_expiration("12/25"), "12/25");
        assert_eq!(format_expiration("1"), "1");
        assert_eq!(format_expiration("12"), "12/");
    }

    #[test]
    fn test_expiration_rules() {
        let today = day(2026, 10, 18);
        assert_eq!(validate_expiration("10/26", today), Ok(()));
        assert_eq!(validate_expiration("09/26", today), Err(ExpirationError::Expired));
        assert_eq!(validate_expiration("01/20", today), Err(ExpirationError::Expired));
        assert_eq!(
            validate_expiration("13/30", today),
            Err(ExpirationError::MonthOutOfRange)
        );
        assert_eq!(
            validate_expiration("00/30", today),
            Err(ExpirationError::MonthOutOfRange)
        );
        assert_eq!(validate_expiration("1/30", today), Err(ExpirationError::Malformed));
    }

    #[test]
    fn test_cvv() {
        assert!(!validate_cvv("12"));
        assert!(validate_cvv("123"));
        assert!(validate_cvv("1234"));
        assert!(!validate_cvv("12345"));
        assert!(!validate_cvv("12a"));
    }

    #[test]
    fn test_validation_order_short_circuits() {
        let today = day(2026, 10, 18);
        let mut screen = PaymentScreen::new(1);
        screen.set_card_number("1234");
        screen.set_expiration("01/20");
        screen.set_cvv("1");
        assert_eq!(
            screen.process_payment_at(today),
            Err(PaymentError::InvalidCardNumber)
        );

        screen.set_card_number("4532015112830366");
        assert_eq!(
            screen.process_payment_at(today),
            Err(PaymentError::InvalidExpiration(ExpirationError::Expired))
        );
        assert!(screen.error_message().unwrap().contains("expired"));

        screen.set_expiration("12/99");
        assert_eq!(screen.process_payment_at(today), Err(PaymentError::InvalidCvv));
        assert!(!screen.payment_success());
        assert!(screen.contract().is_none());
    }

    #[test]
    fn test_successful_payment_records_contract() {
        let mut screen = PaymentScreen::new(2);
        screen.set_card_number("4532015112830366");
        screen.set_expiration("1299");
        screen.set_cvv("123");

        screen.process_payment_at(day(2026, 10, 18)).unwrap();
        assert!(screen.payment_success());
        assert!(screen.processing_was_shown());
        assert!(!screen.is_processing());
        let contract = screen.contract().unwrap();
        assert_eq!(contract.plan_identifier, 2);
        assert_eq!(contract.card_last_four, "0366");
        assert_eq!(screen.plan().unwrap().title, "REGULAR");
    }

    #[test]
    fn test_long_expiration_is_validated_as_typed() {
        let today = day(2026, 10, 18);
        let mut screen = PaymentScreen::new(1);
        screen.set_card_number("4532015112830366");
        screen.set_cvv("123");

        screen.set_expiration("12/2030");
        assert_eq!(screen.expiration(), "12/20");
        assert_eq!(
            screen.process_payment_at(today),
            Err(PaymentError::InvalidExpiration(ExpirationError::Malformed))
        );

        screen.set_expiration("12/2699");
        assert_eq!(
            screen.process_payment_at(today),
            Err(PaymentError::InvalidExpiration(ExpirationError::Malformed))
        );
        assert!(!screen.payment_success());

        screen.set_expiration("12/30");
        assert_eq!(screen.process_payment_at(today), Ok(()));
    }

    #[test]
    fn test_cvv_input_is_capped_and_masked() {
        let mut screen = PaymentScreen::new(1);
        screen.set_cvv("123456");
        assert_eq!(screen.masked_cvv(), "••••");
    }

    proptest! {
        #[test]
        fn prop_card_formatting_groups_digits(digits in "[0-9]{13,19}") {
            let formatted = format_card_number(&digits);
            prop_assert_eq!(formatted.replace(' ', ""), digits.clone());
            prop_assert!(!formatted.contains("  "));
            for (i, group) in formatted.split(' ').enumerate() {
                let is_last = (i + 1) * 4 >= digits.len();
                if is_last {
                    prop_assert!(!group.is_empty() && group.len() <= 4);
                } else {
                    prop_assert_eq!(group.len(), 4);
                }
            }
        }

        #[test]
        fn prop_month_out_of_range_fails(month in 13u32..=99, year in 0u32..=99) {
            let input = format!("{:02}{:02}", month, year);
            prop_assert_eq!(
                validate_expiration(&input, NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()),
                Err(ExpirationError::MonthOutOfRange)
            );
        }
    }
}
