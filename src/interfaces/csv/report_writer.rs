use std::io::Write;

use crate::application::engine::BillingRow;
use crate::domain::shop::Shop;
use crate::domain::user::User;
use crate::error::Result;

/// Writes back-office tables as CSV, one writer call per report.
pub struct ReportWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    /// The shop directory table.
    pub fn write_shops(&mut self, shops: &[Shop]) -> Result<()> {
        self.writer.write_record([
            "id",
            "name",
            "owner",
            "industry",
            "city",
            "mall",
            "shop_number",
            "status",
        ])?;
        for shop in shops {
            self.writer.write_record([
                shop.id.0.to_string(),
                shop.name.clone(),
                shop.owner_name.clone(),
                shop.industry.clone(),
                shop.city.clone(),
                shop.mall.clone(),
                shop.shop_number.clone(),
                shop.status.to_string(),
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }

    /// The admin billing table.
    pub fn write_billing(&mut self, rows: &[BillingRow]) -> Result<()> {
        self.writer.write_record([
            "shop_id",
            "shop",
            "owner",
            "state",
            "amount",
            "currency",
            "last_payment",
            "next_due",
        ])?;
        for row in rows {
            self.writer.write_record([
                row.shop_id.0.to_string(),
                row.shop_name.clone(),
                row.owner_name.clone(),
                row.state.to_string(),
                row.amount.to_string(),
                row.currency.clone(),
                row.last_payment.map(|d| d.to_string()).unwrap_or_default(),
                row.next_due.map(|d| d.to_string()).unwrap_or_default(),
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }

    /// The admin users table.
    pub fn write_users(&mut self, users: &[User]) -> Result<()> {
        self.writer
            .write_record(["id", "name", "email", "role", "status"])?;
        for user in users {
            self.writer.write_record([
                user.id.0.to_string(),
                user.name.clone(),
                user.email.clone(),
                user.role.to_string(),
                user.status.to_string(),
            ])?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::forms::ShopForm;
    use crate::domain::shop::ShopId;
    use crate::domain::user::UserId;
    use chrono::Utc;

    #[test]
    fn test_shop_report_rows() {
        let form = ShopForm {
            name: "Fashion Hub".to_string(),
            industry: "Apparel".to_string(),
            shop_number: "B-12".to_string(),
            city: "Nairobi".to_string(),
            mall: "The Hub".to_string(),
            whatsapp: "+254700000001".to_string(),
            ..Default::default()
        };
        let mut shop = Shop::from_form(
            ShopId(1),
            UserId(7),
            "Jane Smith".to_string(),
            form,
            Utc::now(),
        );
        shop.approve(Utc::now()).unwrap();

        let mut out = Vec::new();
        ReportWriter::new(&mut out).write_shops(&[shop]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,name,owner,industry,city,mall,shop_number,status"
        );
        assert_eq!(
            lines.next().unwrap(),
            "1,Fashion Hub,Jane Smith,Apparel,Nairobi,The Hub,B-12,active"
        );
    }
}
