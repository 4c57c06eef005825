use crate::infra::{
    default_unit_catalog, parse_child, InMemoryKeyValueStore, InMemoryReservationRepository,
};
use chrono::Datelike;
use clap::Args;
use rental_quote::config::AppConfig;
use rental_quote::error::AppError;
use rental_quote::quote::{
    parse_calendar_date, ChildDetail, Quote, QuoteService, ReservationCsvImporter,
    StayRequestPayload, UnitAvailability,
};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

type LocalQuoteService = QuoteService<InMemoryReservationRepository, InMemoryKeyValueStore>;

#[derive(Args, Debug)]
pub(crate) struct QuoteArgs {
    /// Arrival date (YYYY-MM-DD)
    #[arg(long)]
    pub(crate) check_in: String,
    /// Departure date (YYYY-MM-DD)
    #[arg(long)]
    pub(crate) check_out: String,
    /// Unit slug to book; repeat for multi-unit stays
    #[arg(long = "unit", required = true)]
    pub(crate) units: Vec<String>,
    /// Number of adults in the party
    #[arg(long, default_value_t = 2)]
    pub(crate) adults: u32,
    /// One child per flag, described as a comma list of under12, parents, crib
    #[arg(long = "child", value_parser = parse_child)]
    pub(crate) children: Vec<ChildDetail>,
    /// Reservation export (id,units,start_date,end_date,status)
    #[arg(long)]
    pub(crate) reservations_csv: Option<PathBuf>,
    /// Seasonal price table for the check-in year
    #[arg(long)]
    pub(crate) seasonal_json: Option<PathBuf>,
    /// Print a WhatsApp share link for this phone number
    #[arg(long)]
    pub(crate) whatsapp: Option<String>,
    /// Print the full quote as JSON instead of the summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct AvailabilityArgs {
    /// Arrival date (YYYY-MM-DD)
    #[arg(long)]
    pub(crate) check_in: String,
    /// Departure date (YYYY-MM-DD)
    #[arg(long)]
    pub(crate) check_out: String,
    /// Reservation export (id,units,start_date,end_date,status)
    #[arg(long)]
    pub(crate) reservations_csv: Option<PathBuf>,
}

fn local_service() -> Result<LocalQuoteService, AppError> {
    let config = AppConfig::load()?;
    Ok(QuoteService::new(
        default_unit_catalog(),
        Arc::new(InMemoryReservationRepository::default()),
        Arc::new(InMemoryKeyValueStore::default()),
        config.pricing,
    ))
}

fn load_reservations(
    service: &LocalQuoteService,
    path: Option<PathBuf>,
) -> Result<usize, AppError> {
    match path {
        Some(path) => {
            let reservations = ReservationCsvImporter::from_path(path)?;
            Ok(service.replace_reservations(reservations)?)
        }
        None => Ok(0),
    }
}

pub(crate) fn run_quote(args: QuoteArgs) -> Result<(), AppError> {
    let QuoteArgs {
        check_in,
        check_out,
        units,
        adults,
        children,
        reservations_csv,
        seasonal_json,
        whatsapp,
        json,
    } = args;

    let service = local_service()?;
    load_reservations(&service, reservations_csv)?;

    if let Some(path) = seasonal_json {
        let raw = std::fs::read_to_string(path)?;
        // Unparsable dates are reported by the quote itself.
        if let Some(date) = parse_calendar_date(&check_in) {
            let table = service.store_seasonal_prices(date.year(), raw)?;
            if table.is_empty() {
                eprintln!("Seasonal table holds no usable entries; default rates apply");
            }
        }
    }

    let quote = service.quote(StayRequestPayload {
        check_in,
        check_out,
        unit_ids: units,
        adults,
        children,
    })?;

    if json {
        match serde_json::to_string_pretty(&quote) {
            Ok(body) => println!("{body}"),
            Err(err) => println!("Quote payload unavailable: {err}"),
        }
    } else {
        print_quote(&quote);
    }

    if let Some(phone) = whatsapp {
        println!("\nWhatsApp: {}", quote.whatsapp_link(&phone));
    }

    Ok(())
}

pub(crate) fn run_availability(args: AvailabilityArgs) -> Result<(), AppError> {
    let service = local_service()?;
    let loaded = load_reservations(&service, args.reservations_csv)?;
    let units = service.availability(&args.check_in, &args.check_out)?;

    println!(
        "Availability {} -> {} ({} reservations loaded)",
        args.check_in, args.check_out, loaded
    );
    print_availability(&units);
    Ok(())
}

pub(crate) fn run_demo() -> Result<(), AppError> {
    println!("Rental quote demo");

    println!("\nDefault weekly rate, 4 adults, 7 nights");
    let service = local_service()?;
    let quote = service.quote(demo_payload(4, Vec::new()))?;
    print_quote(&quote);

    println!("\nSeasonal week priced at 910€");
    let table = json!([
        { "unitId": "u1", "weekStart": "2024-07-01", "weekEnd": "2024-07-07", "price": 910 }
    ]);
    service.store_seasonal_prices(2024, table.to_string())?;
    let quote = service.quote(demo_payload(4, Vec::new()))?;
    print_quote(&quote);

    println!("\nChild under 12 sleeping with the parents");
    let child = ChildDetail {
        is_under12: true,
        sleeps_with_parents: true,
        sleeps_in_crib: false,
    };
    let quote = service.quote(demo_payload(2, vec![child]))?;
    let guests = &quote.guests;
    println!(
        "- {} guests | {} beds needed | {} taxable | tourist tax {}€",
        guests.total_guests,
        guests.effective_guest_count,
        guests.taxable_guests,
        quote.calculation.tourist_tax
    );

    println!("\nStay 2024-08-10 -> 2024-08-15 against reservation 2024-08-12 -> 2024-08-20");
    for status in ["active", "cancelled"] {
        let export = format!(
            "id,units,start_date,end_date,status\nr-0812,u1,2024-08-12,2024-08-20,{status}\n"
        );
        let reservations = ReservationCsvImporter::from_reader(export.as_bytes())?;
        service.replace_reservations(reservations)?;
        println!("Existing reservation {status}:");
        print_availability(&service.availability("2024-08-10", "2024-08-15")?);
    }

    Ok(())
}

fn demo_payload(adults: u32, children: Vec<ChildDetail>) -> StayRequestPayload {
    StayRequestPayload {
        check_in: "2024-07-01".to_string(),
        check_out: "2024-07-08".to_string(),
        unit_ids: vec!["u1".to_string()],
        adults,
        children,
    }
}

fn print_quote(quote: &Quote) {
    println!("{}", quote.summary.trim_end());
    if !quote.selected_units_available {
        println!("Attenzione: uno o più alloggi non sono disponibili per queste date");
    }
}

fn print_availability(units: &[UnitAvailability]) {
    for unit in units {
        if unit.available {
            println!("  - {}: available", unit.unit_id);
        } else {
            println!(
                "  - {}: booked ({})",
                unit.unit_id,
                unit.conflicts.join(", ")
            );
        }
    }
}
