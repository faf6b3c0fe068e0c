use home_price_estimator::estimator::Estimator;
use home_price_estimator::form::*;
use home_price_estimator::models::*;
use home_price_estimator::regressor::{FeatureValue, ModelInput, PredictionError, RegressionModel};
use speculate2::speculate;

struct FixedModel(f64);

impl RegressionModel for FixedModel {
    fn predict(&self, _input: &ModelInput) -> Result<f64, PredictionError> {
        Ok(self.0)
    }
}

speculate! {
    before {
        let mut form = FormState::default();
    }

    describe "defaults" {
        it "starts with the smallest selections and empty fields" {
            assert_eq!(form.bedrooms, Bedrooms::One);
            assert_eq!(form.bathrooms, Bathrooms::One);
            assert_eq!(form.parking_spaces, SpaceCount::None);
            assert_eq!(form.garage_spaces, SpaceCount::None);
            assert_eq!(form.square_feet, 0);
            assert_eq!(form.lot_size, 0);
            assert!(!form.corner_lot);
            assert!(!form.waterfront);
        }

        it "displays a zero price" {
            assert_eq!(form.price(), PriceEstimate::ZERO);
            assert_eq!(form.price().amount(), 0.0);
        }

        it "builds a record with zero parking and no flags" {
            let record = form.record();
            assert_eq!(record.parking_spaces.count(), 0);
            assert_eq!(record.garage_spaces.count(), 0);
            assert_eq!(record.bedrooms.count(), 1);
            assert!(!record.corner_lot);
            assert!(!record.waterfront);
        }
    }

    describe "set_text" {
        it "coerces numeric text" {
            form.set_text(FormField::SquareFeet, "1800").expect("Failed to set square feet");
            form.set_text(FormField::LotSize, " 5,000 ").expect("Failed to set lot size");

            assert_eq!(form.square_feet, 1800);
            assert_eq!(form.lot_size, 5000);
        }

        it "keeps the previous value when text is not a number" {
            form.set_text(FormField::SquareFeet, "1800").expect("Failed to set square feet");

            let err = form.set_text(FormField::SquareFeet, "large").unwrap_err();

            assert_eq!(
                err,
                FieldError::NotANumber { field: FormField::SquareFeet, text: "large".into() }
            );
            assert_eq!(form.square_feet, 1800);
        }

        it "rejects negative numbers" {
            let err = form.set_text(FormField::LotSize, "-20").unwrap_err();
            assert_eq!(err, FieldError::Negative { field: FormField::LotSize });
            assert_eq!(form.lot_size, 0);
        }

        it "accepts negative zero as zero" {
            form.set_text(FormField::LotSize, "-0").expect("Failed to set lot size");
            assert_eq!(form.lot_size, 0);
        }

        it "accepts any value that fits an int64" {
            form.set_text(FormField::LotSize, "4,294,967,296").expect("Failed to set lot size");
            assert_eq!(form.lot_size, 4_294_967_296);
            assert_eq!(
                form.record().to_model_input().get("lot_size"),
                Some(&FeatureValue::Int64(4_294_967_296))
            );

            form.set_text(FormField::LotSize, "9223372036854775807")
                .expect("Failed to set lot size");
            assert_eq!(form.lot_size, MAX_WHOLE_NUMBER);
        }

        it "rejects numbers past the int64 range" {
            let err = form.set_text(FormField::SquareFeet, "9223372036854775808").unwrap_err();
            assert_eq!(err, FieldError::TooLarge { field: FormField::SquareFeet });

            let err = form.set_text(FormField::SquareFeet, "99999999999999999999").unwrap_err();
            assert_eq!(err, FieldError::TooLarge { field: FormField::SquareFeet });
            assert_eq!(form.square_feet, 0);
        }

        it "sets selections from their counts" {
            form.set_text(FormField::Bedrooms, "4").expect("Failed to set bedrooms");
            form.set_text(FormField::Bathrooms, "2").expect("Failed to set bathrooms");
            form.set_text(FormField::GarageSpaces, "none").expect("Failed to set garage");
            form.set_text(FormField::ParkingSpaces, "5").expect("Failed to set parking");

            assert_eq!(form.bedrooms, Bedrooms::Four);
            assert_eq!(form.bathrooms, Bathrooms::Two);
            assert_eq!(form.garage_spaces, SpaceCount::None);
            assert_eq!(form.parking_spaces, SpaceCount::Five);
        }

        it "rejects selections outside the picker" {
            let err = form.set_text(FormField::Bedrooms, "7").unwrap_err();
            assert!(matches!(err, FieldError::Selection(_)));
            assert_eq!(form.bedrooms, Bedrooms::One);
        }

        it "parses flags" {
            form.set_text(FormField::CornerLot, "yes").expect("Failed to set corner lot");
            form.set_text(FormField::Waterfront, "On").expect("Failed to set waterfront");
            assert!(form.corner_lot);
            assert!(form.waterfront);

            let err = form.set_text(FormField::Waterfront, "sometimes").unwrap_err();
            assert_eq!(err.to_string(), "Waterfront expects yes or no, got `sometimes`");
            assert!(form.waterfront);
        }
    }

    describe "toggle" {
        it "flips a flag each time" {
            form.toggle(Toggle::CornerLot);
            assert!(form.corner_lot);
            form.toggle(Toggle::CornerLot);
            assert!(!form.corner_lot);
            assert!(!form.waterfront);
        }
    }

    describe "reset" {
        it "restores inputs but keeps the displayed price" {
            let estimator = Estimator::new(FixedModel(250_000.0));
            form.apply(FieldEdit::Bedrooms(Bedrooms::Three));
            form.apply(FieldEdit::SquareFeet(2400));
            form.apply(FieldEdit::Waterfront(true));
            estimator.refresh(&mut form);

            form.reset();

            assert_eq!(form.bedrooms, Bedrooms::One);
            assert_eq!(form.square_feet, 0);
            assert!(!form.waterfront);
            assert_eq!(form.price().amount(), 250_000.0);
        }
    }

    describe "record" {
        it "mirrors the current values" {
            form.apply(FieldEdit::Bedrooms(Bedrooms::Three));
            form.apply(FieldEdit::Bathrooms(Bathrooms::Two));
            form.apply(FieldEdit::SquareFeet(1800));
            form.apply(FieldEdit::ParkingSpaces(SpaceCount::Two));
            form.apply(FieldEdit::GarageSpaces(SpaceCount::One));
            form.apply(FieldEdit::LotSize(5000));

            assert_eq!(form.record(), FeatureRecord {
                bedrooms: Bedrooms::Three,
                bathrooms: Bathrooms::Two,
                square_feet: 1800,
                parking_spaces: SpaceCount::Two,
                garage_spaces: SpaceCount::One,
                corner_lot: false,
                lot_size: 5000,
                waterfront: false,
            });
        }

        it "is a snapshot that later edits do not change" {
            let record = form.record();
            form.apply(FieldEdit::SquareFeet(900));
            assert_eq!(record.square_feet, 0);
        }
    }
}
