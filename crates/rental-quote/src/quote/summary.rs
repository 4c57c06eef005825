use super::calculator::PriceCalculation;
use super::domain::StayRequest;
use super::guests::GuestCapacity;
use chrono::{Datelike, NaiveDate};
use std::fmt::Write;

const WEEKDAYS: [&str; 7] = [
    "lunedì",
    "martedì",
    "mercoledì",
    "giovedì",
    "venerdì",
    "sabato",
    "domenica",
];

const MONTHS: [&str; 12] = [
    "gennaio",
    "febbraio",
    "marzo",
    "aprile",
    "maggio",
    "giugno",
    "luglio",
    "agosto",
    "settembre",
    "ottobre",
    "novembre",
    "dicembre",
];

const NOT_AVAILABLE: &str = "N/D, contattaci";

/// `sabato 1 giugno 2024`
pub fn format_italian_date(date: NaiveDate) -> String {
    let weekday = WEEKDAYS[date.weekday().num_days_from_monday() as usize];
    let month = MONTHS[date.month0() as usize];
    format!("{weekday} {} {month} {}", date.day(), date.year())
}

fn plural<'a>(count: u32, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 {
        one
    } else {
        many
    }
}

/// Human-readable booking summary used for e-mail, PDF and WhatsApp exports.
pub struct QuoteSummary<'a> {
    pub request: &'a StayRequest,
    pub guests: &'a GuestCapacity,
    pub calculation: &'a PriceCalculation,
    pub total_beds: u32,
}

impl QuoteSummary<'_> {
    pub fn render(&self) -> String {
        let calculation = self.calculation;
        let stay = &self.request.stay;
        let mut out = String::new();

        let _ = writeln!(out, "Riepilogo prenotazione");
        let _ = writeln!(out, "Check-in: {}", format_italian_date(stay.check_in()));
        let _ = writeln!(out, "Check-out: {}", format_italian_date(stay.check_out()));
        let _ = writeln!(
            out,
            "Durata: {} {} ({} {})",
            calculation.nights,
            plural(calculation.nights, "notte", "notti"),
            calculation.weeks,
            plural(calculation.weeks, "settimana", "settimane"),
        );

        let names: Vec<&str> = calculation
            .lines
            .iter()
            .map(|line| line.unit_name.as_str())
            .collect();
        let _ = writeln!(out, "Alloggi: {}", names.join(", "));
        let _ = writeln!(out, "Ospiti: {}", self.guest_line());

        if !self.guests.fits_in(self.total_beds) {
            let _ = writeln!(
                out,
                "Attenzione: {} posti letto per {} ospiti",
                self.total_beds, self.guests.effective_guest_count
            );
        }

        let _ = writeln!(out);
        for line in &calculation.lines {
            let _ = writeln!(out, "- {}: {}€", line.unit_name, line.amount);
        }
        let _ = writeln!(out, "Pulizie: {}€", calculation.cleaning_fee);
        let _ = writeln!(out, "Tassa di soggiorno: {}€", calculation.tourist_tax);

        let payment = &calculation.payment;
        if calculation.prices_are_valid && payment.computable {
            let _ = writeln!(out, "Totale: {}€", calculation.total_price);
            let _ = writeln!(
                out,
                "Caparra ({}%): {}€",
                payment.deposit_percent, payment.deposit
            );
            let _ = writeln!(out, "Saldo all'arrivo: {}€", payment.balance_due);
        } else {
            if payment.computable {
                let _ = writeln!(
                    out,
                    "Totale: {NOT_AVAILABLE} (stima {}€)",
                    calculation.total_price
                );
            } else {
                let _ = writeln!(out, "Totale: {NOT_AVAILABLE}");
            }
            let _ = writeln!(out, "Caparra ({}%): {NOT_AVAILABLE}", payment.deposit_percent);
            let _ = writeln!(out, "Saldo all'arrivo: {NOT_AVAILABLE}");
        }
        let _ = write!(
            out,
            "Deposito cauzionale (rimborsabile): {}€",
            payment.security_deposit
        );

        out
    }

    /// `https://wa.me/<digits>?text=<summary>` with the rendered text percent-encoded.
    pub fn whatsapp_link(&self, phone: &str) -> String {
        let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
        let text = self.render();
        let encoded: String = url::form_urlencoded::byte_serialize(text.as_bytes())
            .collect::<String>()
            .replace('+', "%20");
        format!("https://wa.me/{digits}?text={encoded}")
    }

    fn guest_line(&self) -> String {
        let guests = self.guests;
        let adults = self.request.guests.adults;
        let children = guests.total_guests.saturating_sub(adults);

        let mut line = format!("{adults} {}", plural(adults, "adulto", "adulti"));
        if children > 0 {
            let _ = write!(
                line,
                ", {children} {}",
                plural(children, "bambino", "bambini")
            );
            let mut arrangements = Vec::new();
            if guests.sleeping_with_parents > 0 {
                arrangements.push(format!("{} nel letto dei genitori", guests.sleeping_with_parents));
            }
            if guests.sleeping_in_cribs > 0 {
                arrangements.push(format!("{} in culla", guests.sleeping_in_cribs));
            }
            if !arrangements.is_empty() {
                let _ = write!(line, " ({})", arrangements.join(", "));
            }
        }
        line
    }
}
