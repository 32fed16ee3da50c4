//! Token generation for `capability!{..}`.
//!
//! The expansion is one private module per declaration, re-exported with
//! `#[doc(inline)]`, containing the wrapper struct, its dispatch table, the
//! erased functions the table points to, and the constructor.

use core_extensions::SelfOps;

use proc_macro2::TokenStream as TokenStream2;

use quote::{quote, ToTokens};

use syn::{parse_quote, GenericParam, Generics, Ident, WherePredicate};

use crate::{
    declaration::{CapabilityDecl, OperationDecl},
    parse_utils::parse_str_as_ident,
};

/// Identifiers derived from the declaration's name.
struct GeneratedNames {
    /// `{Name}_capability`, the private module holding the expansion.
    generated_mod: Ident,
    /// `{Name}Fns`, the dispatch table struct.
    fns_ty: Ident,
}

impl GeneratedNames {
    fn new(decl: &CapabilityDecl) -> Self {
        Self {
            generated_mod: parse_str_as_ident(&format!("{}_capability", decl.name)),
            fns_ty: parse_str_as_ident(&format!("{}Fns", decl.name)),
        }
    }
}

/// The implementation of the `capability!` proc-macro.
pub(crate) fn capability_impl(decl: CapabilityDecl) -> Result<TokenStream2, syn::Error> {
    let decl = &decl;
    let names = &GeneratedNames::new(decl);

    let mut mod_contents = TokenStream2::default();

    first_items(decl, names, &mut mod_contents);
    erased_fn_items(decl, names, &mut mod_contents);
    constructor_items(decl, names, &mut mod_contents);
    method_items(decl, names, &mut mod_contents);
    delegated_impls(decl, names, &mut mod_contents);

    let vis = &decl.vis;
    let name = &decl.name;
    let GeneratedNames {
        generated_mod,
        fns_ty,
    } = names;

    quote!(
        #[doc(inline)]
        #vis use self::#generated_mod::{#name, #fns_ty};

        #[allow(non_snake_case)]
        #vis mod #generated_mod {
            #[allow(unused_imports)]
            use super::*;

            use captable::__cap_re as __cap;

            #mod_contents
        }
    )
    .piped(Ok)
}

/// The wrapper's generics: the declaration's generics with the subject
/// lifetime `'s` prepended.
fn wrapper_generics(decl: &CapabilityDecl) -> Generics {
    let mut generics = decl.generics.clone();
    generics.params.insert(0, parse_quote!('s));
    generics
}

fn type_param_idents(decl: &CapabilityDecl) -> Vec<&Ident> {
    decl.generics
        .params
        .iter()
        .filter_map(|param| match param {
            GenericParam::Type(type_param) => Some(&type_param.ident),
            _ => None,
        })
        .collect()
}

fn where_predicates(decl: &CapabilityDecl) -> Vec<&WherePredicate> {
    decl.generics
        .where_clause
        .iter()
        .flat_map(|clause| clause.predicates.iter())
        .collect()
}

fn erased_fn_ident(op: &OperationDecl) -> Ident {
    parse_str_as_ident(&format!("__cap_{}", op.name))
}

/// Outputs these items:
///
/// - `{Name}Fns`: the dispatch table, one `unsafe fn` field per operation in
///   declaration order, `Copy` without bounds on the type parameters. The
///   fields take `SubjectRef<'s>`, so an operation's elided return borrow is
///   the wrapper lifetime.
///
/// - `{Name}`: the wrapper struct, a sealed subject plus its table. Its type
///   depends only on the declaration and its type arguments.
fn first_items(decl: &CapabilityDecl, names: &GeneratedNames, mod_: &mut TokenStream2) {
    let attrs = &decl.attrs;
    let name = &decl.name;
    let fns_ty = &names.fns_ty;
    let where_clause = &decl.generics.where_clause;
    let ty_params = type_param_idents(decl);

    let w_generics = wrapper_generics(decl);
    let (w_impl_g, w_ty_g, w_where) = w_generics.split_for_impl();

    let op_fields = decl.operations.iter().map(|op| {
        let op_name = &op.name;
        let param_tys = op.params.iter().map(|param| &param.ty);
        let ret = op.ret.as_ref().map(|ty| quote!(-> #ty));
        quote!(
            #op_name: unsafe fn(__cap::SubjectRef<'s> #(, #param_tys)*) #ret,
        )
    });

    let fns_doc = format!(
        "The dispatch table of [`{0}`]: one function pointer per operation, \
         in declaration order, monomorphized for the subject type it was \
         built from.",
        name,
    );
    let wrapper_doc = format!(
        "The subject this `{0}` was bound to, type-erased. \
         The wrapper's type depends only on the declaration, \
         never on the subject's type.",
        name,
    );

    quote!(
        #[doc = #fns_doc]
        pub struct #fns_ty #w_generics #where_clause {
            _cap_tys: __cap::PhantomData<fn(&'s () #(, #ty_params)*)>,
            #(#op_fields)*
        }

        impl #w_impl_g ::std::marker::Copy for #fns_ty #w_ty_g #w_where {}

        impl #w_impl_g ::std::clone::Clone for #fns_ty #w_ty_g #w_where {
            fn clone(&self) -> Self {
                *self
            }
        }

        #(#attrs)*
        pub struct #name #w_generics #where_clause {
            #[doc = #wrapper_doc]
            subject: __cap::SealedSubject<'s>,
            fns: #fns_ty #w_ty_g,
        }
    )
    .to_tokens(mod_);
}

/// One erased function per operation. Each casts the subject pointer back to
/// the bound type and evaluates the declaration's implementation body with
/// the subject binding in scope.
///
/// `'__cap` is the one input lifetime, so an elided return borrow resolves
/// to it; the `_Subject: '__cap` bound is what lets the cast hand back a
/// `&'__cap _Subject`. `bind` instantiates `'__cap` at the wrapper lifetime
/// when it fills the table.
fn erased_fn_items(decl: &CapabilityDecl, _names: &GeneratedNames, mod_: &mut TokenStream2) {
    let subject_binding = &decl.subject_binding;
    let subject_bounds = &decl.subject_bounds;
    let decl_params = &decl.generics.params;
    let preds = where_predicates(decl);

    for op in &decl.operations {
        let erased_name = erased_fn_ident(op);
        let param_names = op.params.iter().map(|param| &param.name);
        let param_tys = op.params.iter().map(|param| &param.ty);
        let ret = op.ret.as_ref().map(|ty| quote!(-> #ty));
        let body = &op.body;

        quote!(
            #[allow(unused_variables)]
            unsafe fn #erased_name<'__cap, _Subject, #decl_params>(
                __cap_this: __cap::SubjectRef<'__cap>,
                #(#param_names: #param_tys,)*
            ) #ret
            where
                _Subject: #subject_bounds + '__cap,
                #(#preds,)*
            {
                let #subject_binding: &_Subject = __cap_this.cast_into_ref();
                #body
            }
        )
        .to_tokens(mod_);
    }
}

/// The `bind` constructor: seals the subject and fills the table with the
/// erased functions monomorphized for the subject type.
fn constructor_items(decl: &CapabilityDecl, names: &GeneratedNames, mod_: &mut TokenStream2) {
    let name = &decl.name;
    let fns_ty = &names.fns_ty;
    let subject_bounds = &decl.subject_bounds;
    let preds = where_predicates(decl);
    let ty_params = type_param_idents(decl);

    let w_generics = wrapper_generics(decl);
    let (w_impl_g, w_ty_g, w_where) = w_generics.split_for_impl();

    let op_inits = decl.operations.iter().map(|op| {
        let op_name = &op.name;
        let erased_name = erased_fn_ident(op);
        let ty_params = ty_params.iter();
        quote!(
            #op_name: #erased_name::<_Subject #(, #ty_params)*>,
        )
    });

    let with_clone = decl
        .flags
        .clone
        .then(|| quote!(.with_clone(__cap::clone_subject_impl::<_Subject>)));
    let with_debug = decl
        .flags
        .debug
        .then(|| quote!(.with_debug(__cap::debug_subject_impl::<_Subject>)));
    let with_display = decl
        .flags
        .display
        .then(|| quote!(.with_display(__cap::display_subject_impl::<_Subject>)));

    let bind_doc = format!(
        "Binds `subject`, producing a `{0}` whose type is independent of \
         the subject's type.\n\n\
         `unseal` is either [`SD_CanUnseal`] (records the subject's type, \
         allowing `cap_unseal`/`cap_unseal_ref` later) or [`SD_Opaque`] \
         (records nothing, and also allows non-`'static` subjects).\n\n\
         [`SD_CanUnseal`]: captable::type_level::unsealing::SD_CanUnseal\n\
         [`SD_Opaque`]: captable::type_level::unsealing::SD_Opaque",
        name,
    );

    quote!(
        impl #w_impl_g #name #w_ty_g #w_where {
            #[doc = #bind_doc]
            pub fn bind<_Subject, _Unseal>(subject: _Subject, unseal: _Unseal) -> Self
            where
                _Subject: #subject_bounds + 's,
                _Unseal: __cap::GetSubjectId<_Subject>,
                #(#preds,)*
            {
                let _ = unseal;
                let subject_fns = __cap::SubjectFns::new(
                    <_Unseal as __cap::GetSubjectId<_Subject>>::ID,
                    __cap::drop_subject_impl::<_Subject>,
                )
                #with_clone
                #with_debug
                #with_display;
                #name {
                    subject: unsafe { __cap::SealedSubject::seal(subject, subject_fns) },
                    fns: #fns_ty {
                        _cap_tys: __cap::PhantomData,
                        #(#op_inits)*
                    },
                }
            }
        }
    )
    .to_tokens(mod_);
}

/// The forwarding methods, one per operation with the declared signature,
/// plus the `cap_`-prefixed wrapper-level methods.
fn method_items(decl: &CapabilityDecl, names: &GeneratedNames, mod_: &mut TokenStream2) {
    let name = &decl.name;
    let fns_ty = &names.fns_ty;

    let w_generics = wrapper_generics(decl);
    let (w_impl_g, w_ty_g, w_where) = w_generics.split_for_impl();

    let methods = decl.operations.iter().map(|op| {
        let attrs = &op.attrs;
        let op_name = &op.name;
        let param_names = op.params.iter().map(|param| &param.name);
        let param_tys = op.params.iter().map(|param| &param.ty);
        let forwarded = op.params.iter().map(|param| &param.name);
        let ret = op.ret.as_ref().map(|ty| quote!(-> #ty));
        quote!(
            #(#attrs)*
            #[inline]
            pub fn #op_name(&self #(, #param_names: #param_tys)*) #ret {
                unsafe { (self.fns.#op_name)(self.subject.subject_ref() #(, #forwarded)*) }
            }
        )
    });

    let fns_doc = "The dispatch table, in declaration order.";
    let unseal_doc =
        "Unwraps the sealed subject by value.\n\n\
         Errs, returning the intact wrapper, if `_Subject` is not the bound \
         type or the wrapper was built with `SD_Opaque`.";
    let unseal_ref_doc =
        "Borrows the sealed subject.\n\n\
         Errs if `_Subject` is not the bound type or the wrapper was built \
         with `SD_Opaque`.";

    quote!(
        impl #w_impl_g #name #w_ty_g #w_where {
            #(#methods)*

            #[doc = #fns_doc]
            #[inline]
            pub fn cap_fns(&self) -> &#fns_ty #w_ty_g {
                &self.fns
            }

            #[doc = #unseal_doc]
            pub fn cap_unseal<_Subject>(
                self,
            ) -> ::std::result::Result<_Subject, __cap::UnsealError<Self>>
            where
                _Subject: 'static,
            {
                let #name { subject, fns } = self;
                subject
                    .unseal::<_Subject>()
                    .map_err(move |e| e.map(move |sealed| #name { subject: sealed, fns }))
            }

            #[doc = #unseal_ref_doc]
            pub fn cap_unseal_ref<_Subject>(
                &self,
            ) -> ::std::result::Result<&_Subject, __cap::UnsealError<()>>
            where
                _Subject: 'static,
            {
                self.subject.unseal_ref::<_Subject>()
            }
        }
    )
    .to_tokens(mod_);
}

/// Impls gated on the marker-like capabilities named in the subject bounds.
///
/// `bind` constrains every subject with the full bound list, so a wrapper
/// whose declaration names `Send` only ever seals `Send` subjects, which is
/// what makes the unconditional `unsafe impl` sound. Same for `Sync`.
fn delegated_impls(decl: &CapabilityDecl, names: &GeneratedNames, mod_: &mut TokenStream2) {
    let name = &decl.name;
    let _ = names;

    let w_generics = wrapper_generics(decl);
    let (w_impl_g, w_ty_g, w_where) = w_generics.split_for_impl();

    if decl.flags.send {
        quote!(
            unsafe impl #w_impl_g ::std::marker::Send for #name #w_ty_g #w_where {}
        )
        .to_tokens(mod_);
    }
    if decl.flags.sync {
        quote!(
            unsafe impl #w_impl_g ::std::marker::Sync for #name #w_ty_g #w_where {}
        )
        .to_tokens(mod_);
    }
    if decl.flags.clone {
        quote!(
            impl #w_impl_g ::std::clone::Clone for #name #w_ty_g #w_where {
                fn clone(&self) -> Self {
                    #name {
                        subject: self.subject.cloned(),
                        fns: self.fns,
                    }
                }
            }
        )
        .to_tokens(mod_);
    }
    if decl.flags.debug {
        quote!(
            impl #w_impl_g ::std::fmt::Debug for #name #w_ty_g #w_where {
                fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                    self.subject.fmt_debug(f)
                }
            }
        )
        .to_tokens(mod_);
    }
    if decl.flags.display {
        quote!(
            impl #w_impl_g ::std::fmt::Display for #name #w_ty_g #w_where {
                fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                    self.subject.fmt_display(f)
                }
            }
        )
        .to_tokens(mod_);
    }
}
