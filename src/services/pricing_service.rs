use crate::models::{
    catalog::{DailyRate, HotelTier},
    inquiry::CostBreakdown,
    itinerary::ItineraryItem,
};

const TAX_RATE: f64 = 0.10;

pub struct PricingService;

impl PricingService {
    /// Sum of nights across every itinerary item
    pub fn calculate_total_nights(items: &[ItineraryItem]) -> u32 {
        items.iter().map(|item| item.nights).sum()
    }

    /// Billable service days. Never below one, even with an empty itinerary.
    pub fn billable_days(total_nights: u32) -> u32 {
        total_nights.max(1)
    }

    pub fn calculate_hotel_cost(
        total_nights: u32,
        hotel_tier: Option<&HotelTier>,
        travellers: u32,
    ) -> f64 {
        hotel_tier.map_or(0.0, |tier| {
            round_money(total_nights as f64 * tier.price_per_night * travellers as f64)
        })
    }

    /// Cost of a per-day service (vehicle, tour guide or driver)
    pub fn calculate_daily_cost<S: DailyRate>(total_nights: u32, service: Option<&S>) -> f64 {
        service.map_or(0.0, |service| {
            round_money(Self::billable_days(total_nights) as f64 * service.price_per_day())
        })
    }

    pub fn calculate_taxes(subtotal: f64) -> f64 {
        round_money(subtotal * TAX_RATE)
    }

    pub fn calculate_breakdown<V, G, D>(
        items: &[ItineraryItem],
        hotel_tier: Option<&HotelTier>,
        vehicle: Option<&V>,
        tour_guide: Option<&G>,
        driver: Option<&D>,
        travellers: u32,
    ) -> CostBreakdown
    where
        V: DailyRate,
        G: DailyRate,
        D: DailyRate,
    {
        let total_nights = Self::calculate_total_nights(items);
        let hotel_cost = Self::calculate_hotel_cost(total_nights, hotel_tier, travellers);
        let transport_cost = Self::calculate_daily_cost(total_nights, vehicle);
        let guide_cost = Self::calculate_daily_cost(total_nights, tour_guide);
        let driver_cost = Self::calculate_daily_cost(total_nights, driver);

        let subtotal = hotel_cost + transport_cost + guide_cost + driver_cost;
        let taxes = Self::calculate_taxes(subtotal);

        CostBreakdown {
            total_nights,
            hotel_cost,
            transport_cost,
            guide_cost,
            driver_cost,
            taxes,
            total_cost: round_money(subtotal + taxes),
        }
    }
}

fn round_money(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
