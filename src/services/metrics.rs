// src/services/metrics.rs
use crate::models::{AnalysisInput, InvestmentMetrics};

/// The 70% rule: total cash committed should not exceed this fraction of ARV.
const MAX_INVESTMENT_RATIO: f64 = 0.70;

/// Annual maintenance reserve as a fraction of property value.
const ANNUAL_MAINTENANCE_RATE: f64 = 0.015;

fn guarded_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Converts raw form inputs into the full set of derived investment
/// metrics. Never fails: every field is defensively parsed with its
/// documented default (0, except management fees 10% and vacancy 5%),
/// and every ratio yields 0 when its denominator is not positive.
pub fn compute_metrics(input: &AnalysisInput) -> InvestmentMetrics {
    let purchase_price = input.purchase_price.parse_or(0.0);
    let closing_costs = input.closing_costs.parse_or(0.0);
    let repair_costs = input.repair_costs.parse_or(0.0);
    let monthly_rent = input.monthly_rent.parse_or(0.0);
    let mortgage_payment = input.mortgage_payment.parse_or(0.0);
    let property_taxes = input.property_taxes.parse_or(0.0);
    let insurance = input.insurance.parse_or(0.0);
    let management_fee_rate = input.management_fees.parse_or(10.0) / 100.0;
    let vacancy_rate = input.vacancy_rate.parse_or(5.0) / 100.0;
    let loan_amount = input.loan_amount.parse_or(0.0);
    let property_value = input.property_value.parse_or(0.0);
    let market_value_comparables = input.market_value_comparables.parse_or(0.0);
    let noi = input.noi.parse_or(0.0);
    let annual_debt_service = input.annual_debt_service.parse_or(0.0);
    let operating_expenses = input.operating_expenses.parse_or(0.0);

    // Core purchase analysis. The comparables-derived value takes
    // precedence over the owner-entered value when present.
    let arv = if market_value_comparables > 0.0 {
        market_value_comparables
    } else {
        property_value
    };
    let max_total_investment = arv * MAX_INVESTMENT_RATIO;
    let total_investment = purchase_price + repair_costs + closing_costs;
    let max_purchase_price = max_total_investment - repair_costs - closing_costs;
    let available_rehab_budget = max_total_investment - purchase_price - closing_costs;

    // Monthly expense build-up
    let monthly_taxes = property_taxes / 12.0;
    let monthly_insurance = insurance / 12.0;
    let monthly_management = monthly_rent * management_fee_rate;
    let monthly_expenses = mortgage_payment + monthly_taxes + monthly_insurance + monthly_management;
    let monthly_cash_flow = monthly_rent - monthly_expenses;

    // Annualized figures
    let annual_rent = monthly_rent * 12.0;
    let annual_expenses = monthly_expenses * 12.0;
    let annual_cash_flow = monthly_cash_flow * 12.0;
    let annual_vacancy_cost = annual_rent * vacancy_rate;
    let annual_maintenance = arv * ANNUAL_MAINTENANCE_RATE;

    // Investment ratios, each guarded against a non-positive denominator
    let cash_on_cash_return = guarded_ratio(annual_cash_flow, total_investment) * 100.0;
    let cap_rate = if arv > 0.0 && noi > 0.0 {
        noi / arv * 100.0
    } else {
        0.0
    };
    let ltv_ratio = guarded_ratio(loan_amount, arv) * 100.0;
    let gross_rent_multiplier = guarded_ratio(arv, annual_rent);
    let debt_service_coverage_ratio = guarded_ratio(noi, annual_debt_service);
    let break_even_ratio = guarded_ratio(operating_expenses + annual_debt_service, annual_rent);

    // First-year profitability
    let forced_appreciation = arv - purchase_price;
    let total_return_1yr = annual_cash_flow + forced_appreciation;
    let total_roi = guarded_ratio(total_return_1yr, total_investment) * 100.0;

    // Estimate NOI from rent and expenses when it was not supplied
    let estimated_noi = if noi > 0.0 {
        noi
    } else {
        annual_rent * (1.0 - vacancy_rate) - operating_expenses - annual_maintenance
    };

    InvestmentMetrics {
        arv,
        max_total_investment,
        max_purchase_price,
        total_investment,
        available_rehab_budget,
        monthly_cash_flow,
        annual_cash_flow,
        cash_on_cash_return,
        cap_rate,
        ltv_ratio,
        gross_rent_multiplier,
        debt_service_coverage_ratio,
        break_even_ratio,
        forced_appreciation,
        total_roi,
        annual_vacancy_cost,
        annual_maintenance,
        vacancy_rate: vacancy_rate * 100.0,
        monthly_expenses,
        annual_expenses,
        monthly_rent,
        estimated_noi,
        purchase_price,
        repair_costs,
        closing_costs,
    }
}
