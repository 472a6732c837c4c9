//! Instruction sent to the language model.

/// One identifying field, the marker that replaces it, and where the
/// replacement applies when it is limited to a resume section.
#[derive(Debug, Clone, Copy)]
pub struct Substitution {
    pub field: &'static str,
    pub marker: &'static str,
    pub scope: Option<&'static str>,
}

const fn everywhere(field: &'static str, marker: &'static str) -> Substitution {
    Substitution {
        field,
        marker,
        scope: None,
    }
}

pub const SUBSTITUTIONS: [Substitution; 7] = [
    everywhere("Nome Completo", "CANDIDATO(A)"),
    everywhere("Telefone", "TELEFONE REMOVIDO"),
    everywhere("Endereço Físico", "ENDEREÇO REMOVIDO"),
    everywhere("Endereço de Email", "EMAIL REMOVIDO"),
    everywhere(
        "Links Pessoais (LinkedIn, GitHub, Portfólio)",
        "LINK REMOVIDO",
    ),
    Substitution {
        field: "Nome da Empresa",
        marker: "EMPRESA CONFIDENCIAL",
        scope: Some(
            "Na seção \"Experiência Profissional\", substitua o nome da empresa. \
Mantenha o cargo, as datas e as responsabilidades.",
        ),
    },
    Substitution {
        field: "Nome da Instituição de Ensino",
        marker: "INSTITUIÇÃO DE ENSINO",
        scope: Some(
            "Na seção \"Formação Acadêmica\", substitua o nome da instituição. \
Mantenha o nome do curso e as datas.",
        ),
    },
];

/// Build the redaction prompt for `resume_text`.
///
/// The text is embedded verbatim between `---` fences.
pub fn build_prompt(resume_text: &str) -> String {
    let mut prompt = String::from(
        "Com base no seguinte texto de currículo, processe-o para remover informações de \
identificação pessoal, substituindo-as por marcadores genéricos. O objetivo é criar um \
currículo \"cego\" que evite vieses de recrutamento.\n\n\
Siga estas diretrizes de anonimização estritamente:\n\n",
    );

    for substitution in SUBSTITUTIONS {
        prompt.push_str(&format!(
            "* **{}:** Substitua por \"**{}**\".",
            substitution.field, substitution.marker
        ));
        if let Some(scope) = substitution.scope {
            prompt.push(' ');
            prompt.push_str(scope);
        }
        prompt.push('\n');
    }

    prompt.push_str(
        "\nMantenha todo o restante do conteúdo, como descrições de cargo, habilidades técnicas, \
projetos e idiomas, exatamente como está. A estrutura (títulos, listas, parágrafos) deve ser \
preservada.\n\n\
**Texto do Currículo para Processar:**\n---\n",
    );
    prompt.push_str(resume_text);
    prompt.push_str(
        "\n---\n\n\
**Formato da Saída:** Retorne apenas o currículo processado em formato de texto simples, com \
as informações sensíveis substituídas conforme as diretrizes.\n",
    );

    prompt
}
