use crate::utils::AttrArgs;
use proc_macro2::{Ident, Span, TokenStream};
use quote::quote;
use syn::{Field, Type};

#[derive(Debug, Clone)]
/// Single entry in EMI register mapping. Parsed from field attributes and to be used in proc macros
pub struct Entry {
    pub field_name: String,
    pub addr: Address,
    pub ty: DataType,
    pub scaler: Scaler,
    pub unit: String,
}

pub type Address = u16;
pub type Quantity = u16;
pub type Scaler = i8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    U16,
    U32,
    Clock,
    Octets(u8),
}

impl From<String> for DataType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "u16" => DataType::U16,
            "u32" => DataType::U32,
            "clock" => DataType::Clock,
            octets if octets.starts_with("octets(") && octets.ends_with(')') => {
                let size = octets["octets(".len()..octets.len() - 1].trim().parse::<u8>().unwrap_or_else(
                    |_| panic!("Octets `ty` variant has invalid length argument \"{octets}\".")
                );
                DataType::Octets(size)
            },
            s => panic!("Invalid `ty` variant \"{s}\". Use one of \"u16\", \"u32\", \"clock\" or \"octets(len)\"."),
        }
    }
}

impl DataType {
    pub fn word_size(&self) -> Quantity {
        match self {
            DataType::U16 => 1,
            DataType::U32 => 2,
            DataType::Clock => 6,
            &DataType::Octets(len) => Quantity::from(len).div_ceil(2),
        }
    }

    /// Rust type the annotated field must have.
    pub fn field_ty(&self) -> &'static str {
        match self {
            DataType::U16 | DataType::U32 => "f64",
            DataType::Clock => "ClockRecord",
            DataType::Octets(_) => "OctetString",
        }
    }
}

impl From<Field> for Entry {
    fn from(value: Field) -> Self {
        let field_name = value
            .ident
            .unwrap_or_else(|| panic!("Unexpected unnamed struct field."))
            .to_string();

        // Last path segment, so both `ClockRecord` and `emi_registers::ClockRecord` are accepted.
        let field_ty = match value.ty {
            Type::Path(type_path) => type_path
                .path
                .segments
                .last()
                .unwrap_or_else(|| panic!("Unexpected empty path for `{field_name}` field type."))
                .ident
                .to_string(),
            _ => panic!("Unexpected `syn::Type` variant in `{field_name}` field."),
        };

        let attr = value
            .attrs
            .iter()
            .find(|attr| attr.path().is_ident("emi"))
            .unwrap_or_else(|| panic!("Unexpected missing attribute `emi` for `{field_name}` field."))
            .clone();
        let args = AttrArgs::parse(&attr, &field_name);

        let addr = args
            .int::<Address>("addr")
            .unwrap_or_else(|| args.panic_no_key("addr"));
        let ty: DataType = args
            .string("ty")
            .unwrap_or_else(|| args.panic_no_key("ty"))
            .into();
        let scaler = args.signed_int("scaler").map_or(0, |value| {
            Scaler::try_from(value).unwrap_or_else(|_| {
                panic!("In `emi` attribute for `{field_name}`, the key `scaler` is out of i8 range.")
            })
        });
        let unit = args.string("unit").unwrap_or_default();

        if field_ty != ty.field_ty() {
            panic!(
                "Field `{field_name}` with `ty` {ty:?} must have type `{}`, found `{field_ty}`.",
                ty.field_ty()
            );
        }
        if scaler != 0 && !matches!(ty, DataType::U16 | DataType::U32) {
            panic!("In `emi` attribute for `{field_name}`, `scaler` applies only to \"u16\" and \"u32\".");
        }

        Self {
            field_name,
            addr,
            ty,
            scaler,
            unit,
        }
    }
}

impl Entry {
    // Macro helpers

    pub fn field_name_ident(&self) -> Ident {
        Ident::new(&self.field_name, Span::call_site())
    }

    /// Expression decoding this entry from `transport`.
    pub fn decode_expr(&self) -> TokenStream {
        let addr = self.addr;
        let scaler = self.scaler;
        match self.ty {
            DataType::U16 => quote! {
                emi_registers::decoder::decode_scaled_u16(&mut *transport, #addr, #scaler).await?
            },
            DataType::U32 => quote! {
                emi_registers::decoder::decode_scaled_u32(&mut *transport, #addr, #scaler).await?
            },
            DataType::Clock => quote! {
                emi_registers::decoder::decode_clock_at(&mut *transport, #addr).await?
            },
            DataType::Octets(len) => quote! {
                emi_registers::decoder::decode_octet_string(&mut *transport, #addr, #len).await?
            },
        }
    }
}
