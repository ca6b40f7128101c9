//! Shared fixtures for integration tests

#![allow(dead_code)]

use chrono::NaiveDate;
use records_manager::filters::{FilterCondition, FilterConfig, FilterOperator, FilterValue};
use records_manager::models::{
    Activity, ActivityType, Company, CompanyStatus, Contact, Deal, DealStage, Patient,
};
use records_manager::state::InMemoryRecordStore;

/// A small CRM data set with linked records
pub fn seeded_store() -> InMemoryRecordStore {
    let store = InMemoryRecordStore::new();

    let mut acme = Company::new("Acme").with_industry("Technology");
    acme.employee_count = Some(120);
    acme.is_customer = true;
    let acme_id = store.insert(acme);

    let acme_corp = Company::new("Acme Corp")
        .with_industry("Manufacturing")
        .with_status(CompanyStatus::Prospect);
    store.insert(acme_corp);

    let globex = Company::new("Globex")
        .with_industry("Technology")
        .with_status(CompanyStatus::Inactive);
    store.insert(globex);

    let ada = Contact::new("Ada", "Lovelace")
        .at_company(acme_id)
        .with_email("ada@acme.io");
    let ada_id = store.insert(ada);
    store.insert(Contact::new("Grace", "Hopper").with_email("grace@navy.mil"));

    let deal = Deal::new("Acme platform renewal", 48_000.0)
        .for_company(acme_id)
        .with_contact(ada_id)
        .with_stage(DealStage::Negotiation);
    let deal_id = store.insert(deal);
    store.insert(Deal::new("Globex pilot", 5_000.0));

    let mut call = Activity::new(ActivityType::Call, "Acme renewal call")
        .with_description("Discuss pricing");
    call.company_id = Some(acme_id);
    call.deal_id = Some(deal_id);
    store.insert(call);

    store.insert(Patient::new(
        "John",
        "Doe",
        "MRN-0001",
        NaiveDate::from_ymd_opt(1980, 5, 17).unwrap(),
    ));

    store
}

/// Single-group configuration from (field, operator, value) triples
pub fn config_of(conditions: Vec<(&str, FilterOperator, FilterValue)>) -> FilterConfig {
    FilterConfig::from_conditions(
        conditions
            .into_iter()
            .map(|(field, operator, value)| FilterCondition::on(field, operator, value))
            .collect(),
    )
}
