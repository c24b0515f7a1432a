use serde::Serialize;

use crate::domain::invoice::Currency;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurrencyDto {
  pub code: &'static str,
  pub symbol: &'static str,
  pub locale: &'static str,
}

impl From<Currency> for CurrencyDto {
  fn from(currency: Currency) -> Self {
    Self {
      code: currency.as_str(),
      symbol: currency.symbol(),
      locale: currency.locale(),
    }
  }
}

#[derive(Debug, Default)]
pub struct ListCurrenciesUseCase;

impl ListCurrenciesUseCase {
  pub fn new() -> Self {
    Self
  }

  pub fn execute(&self) -> Vec<CurrencyDto> {
    Currency::ALL.into_iter().map(CurrencyDto::from).collect()
  }
}
