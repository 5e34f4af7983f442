use crate::entry::Entry;
use proc_macro2::{Ident, TokenStream};
use syn::{Data, DeriveInput, Fields};

#[derive(Debug, Clone)]
pub struct Mapping(pub Vec<Entry>);

impl Mapping {
    pub fn new(ast: &DeriveInput) -> Self {
        let data_struct = match ast.data.clone() {
            Data::Struct(data_struct) => data_struct,
            _ => panic!("Trait can be implemented only for a struct."),
        };

        let named_fields = match data_struct.fields {
            Fields::Named(fields_named) => fields_named.named,
            _ => panic!("Trait can be implemented only for a struct with named fields."),
        };
        let mut map: Vec<Entry> = named_fields
            .into_iter()
            .filter(|field| field.attrs.iter().any(|attr| attr.path().is_ident("emi")))
            .map(From::from)
            .collect::<Vec<_>>();

        map.sort_by_key(|x| x.addr);

        Self(map)
    }

    pub fn field_name_vec(&self) -> Vec<Ident> {
        self.0
            .iter()
            .map(|x| x.field_name_ident())
            .collect::<Vec<_>>()
    }

    pub fn decode_expr_vec(&self) -> Vec<TokenStream> {
        self.0.iter().map(|x| x.decode_expr()).collect::<Vec<_>>()
    }
}
